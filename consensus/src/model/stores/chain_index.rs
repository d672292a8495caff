use czz_consensus_core::BlockHeight;
use czz_database::prelude::{BatchDbWriter, CachePolicy, CachedDbAccess, CachedDbItem, DB, DbView, StoreResult};
use czz_database::registry::DatabaseStorePrefixes;
use czz_hashes::Hash;
use rocksdb::WriteBatch;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Big-endian height key so that the heights of the main chain iterate in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct HeightKey([u8; 8]);

impl From<BlockHeight> for HeightKey {
    fn from(height: BlockHeight) -> Self {
        Self(height.to_be_bytes())
    }
}

impl AsRef<[u8]> for HeightKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The last block of the main chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTip {
    pub hash: Hash,
    pub height: BlockHeight,
}

/// Reader API for `ChainIndexStore`. Only main chain blocks have a height entry,
/// side chain blocks are reported as not found.
pub trait ChainIndexStoreReader {
    fn get_height(&self, hash: Hash) -> StoreResult<BlockHeight>;
    fn get_hash(&self, height: BlockHeight) -> StoreResult<Hash>;
    fn get_tip(&self) -> StoreResult<ChainTip>;
}

/// Write API for `ChainIndexStore`. Moving the tip is not append-only and must be guarded.
pub trait ChainIndexStore: ChainIndexStoreReader {
    fn extend_batch(&mut self, batch: &mut WriteBatch, hash: Hash, height: BlockHeight) -> StoreResult<()>;
}

/// A DB + cache implementation of `ChainIndexStore` trait, with concurrent readers support.
#[derive(Clone)]
pub struct DbChainIndexStore {
    hash_by_height: CachedDbAccess<HeightKey, Hash>,
    height_by_hash: CachedDbAccess<Hash, BlockHeight>,
    tip: CachedDbItem<ChainTip>,
}

impl DbChainIndexStore {
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy) -> Self {
        Self {
            hash_by_height: CachedDbAccess::new(db.clone(), cache_policy, DatabaseStorePrefixes::ChainHashByIndex.into()),
            height_by_hash: CachedDbAccess::new(db.clone(), cache_policy, DatabaseStorePrefixes::ChainIndexByHash.into()),
            tip: CachedDbItem::new(db, DatabaseStorePrefixes::ChainTip.into()),
        }
    }

    /// Main chain height of `hash` as of the snapshot behind `view`
    pub fn height_in_view(&self, view: &DbView<'_>, hash: Hash) -> StoreResult<BlockHeight> {
        self.height_by_hash.read_in_view(view, hash)
    }
}

impl ChainIndexStoreReader for DbChainIndexStore {
    fn get_height(&self, hash: Hash) -> StoreResult<BlockHeight> {
        self.height_by_hash.read(hash)
    }

    fn get_hash(&self, height: BlockHeight) -> StoreResult<Hash> {
        self.hash_by_height.read(height.into())
    }

    fn get_tip(&self) -> StoreResult<ChainTip> {
        self.tip.read()
    }
}

impl ChainIndexStore for DbChainIndexStore {
    fn extend_batch(&mut self, batch: &mut WriteBatch, hash: Hash, height: BlockHeight) -> StoreResult<()> {
        self.hash_by_height.write(BatchDbWriter::new(batch), height.into(), hash)?;
        self.height_by_hash.write(BatchDbWriter::new(batch), hash, height)?;
        self.tip.write(BatchDbWriter::new(batch), &ChainTip { hash, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use czz_database::{
        create_temp_db,
        prelude::{ConnBuilder, StoreError, StoreResultExtensions, view},
    };

    #[test]
    fn test_extend_chain() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10)).unwrap();
        let mut store = DbChainIndexStore::new(db.clone(), CachePolicy::Count(10));
        assert!(store.get_tip().optional().unwrap().is_none());

        for height in 0..3u64 {
            let mut batch = WriteBatch::default();
            store.extend_batch(&mut batch, (height + 100).into(), height).unwrap();
            db.write(batch).unwrap();
        }

        assert_eq!(store.get_tip().unwrap(), ChainTip { hash: 102.into(), height: 2 });
        assert_eq!(store.get_height(101.into()).unwrap(), 1);
        assert_eq!(store.get_hash(0).unwrap(), Hash::from(100u64));
        assert!(matches!(store.get_height(7.into()), Err(StoreError::KeyNotFound(_))));

        let reloaded = DbChainIndexStore::new(db.clone(), CachePolicy::Empty);
        assert_eq!(reloaded.get_tip().unwrap().height, 2);
        view(&db, |view| {
            assert_eq!(reloaded.height_in_view(view, 100.into())?, 0);
            assert!(reloaded.height_in_view(view, 7.into()).optional()?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_dropped_batch_keeps_the_committed_tip() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10)).unwrap();
        let mut store = DbChainIndexStore::new(db.clone(), CachePolicy::Count(10));
        let mut batch = WriteBatch::default();
        store.extend_batch(&mut batch, 100.into(), 0).unwrap();
        db.write(batch).unwrap();
        let committed = ChainTip { hash: 100.into(), height: 0 };
        assert_eq!(store.get_tip().unwrap(), committed);

        let mut batch = WriteBatch::default();
        store.extend_batch(&mut batch, 101.into(), 1).unwrap();
        drop(batch);

        assert_eq!(store.get_tip().unwrap(), committed);
        assert!(store.get_height(101.into()).optional().unwrap().is_none());
        assert!(store.get_hash(1).optional().unwrap().is_none());

        let mut batch = WriteBatch::default();
        store.extend_batch(&mut batch, 101.into(), 1).unwrap();
        db.write(batch).unwrap();
        assert_eq!(store.get_tip().unwrap(), ChainTip { hash: 101.into(), height: 1 });
        assert_eq!(store.get_height(101.into()).unwrap(), 1);
    }

    #[test]
    fn test_height_keys_sort_by_height() {
        let keys = [HeightKey::from(1), HeightKey::from(256), HeightKey::from(2)];
        let mut sorted = keys.iter().map(|k| k.0).collect::<Vec<_>>();
        sorted.sort();
        assert_eq!(sorted, vec![1u64.to_be_bytes(), 2u64.to_be_bytes(), 256u64.to_be_bytes()]);
    }
}
