use czz_consensus_core::{block::Block, header::Header};
use czz_database::prelude::{BatchDbWriter, CachePolicy, CachedDbAccess, DB, DbView, StoreError, StoreResult};
use czz_database::registry::DatabaseStorePrefixes;
use czz_hashes::Hash;
use rocksdb::WriteBatch;
use std::sync::Arc;

pub trait BlockStoreReader {
    fn has(&self, hash: Hash) -> StoreResult<bool>;
    fn get_header(&self, hash: Hash) -> StoreResult<Header>;
}

/// A DB + cache implementation of `BlockStoreReader` trait, with concurrency support.
/// Blocks are append only and always written as part of an acceptance batch.
#[derive(Clone)]
pub struct DbBlocksStore {
    access: CachedDbAccess<Hash, Arc<Block>>,
}

impl DbBlocksStore {
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy) -> Self {
        Self { access: CachedDbAccess::new(db, cache_policy, DatabaseStorePrefixes::Blocks.into()) }
    }

    pub fn insert_batch(&self, batch: &mut WriteBatch, hash: Hash, block: Arc<Block>) -> StoreResult<()> {
        if self.access.has(hash)? {
            return Err(StoreError::HashAlreadyExists(hash));
        }
        self.access.write(BatchDbWriter::new(batch), hash, block)
    }

    /// Presence as of the snapshot behind `view`
    pub fn has_in_view(&self, view: &DbView<'_>, hash: Hash) -> StoreResult<bool> {
        self.access.has_in_view(view, hash)
    }
}

impl BlockStoreReader for DbBlocksStore {
    fn has(&self, hash: Hash) -> StoreResult<bool> {
        self.access.has(hash)
    }

    fn get_header(&self, hash: Hash) -> StoreResult<Header> {
        Ok(self.access.read(hash)?.header.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::block_with_parent;
    use czz_database::{
        create_temp_db,
        prelude::{ConnBuilder, view},
    };
    use czz_hashes::ZERO_HASH;

    #[test]
    fn test_blocks_store() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10)).unwrap();
        let store = DbBlocksStore::new(db.clone(), CachePolicy::Count(10));
        let block = block_with_parent(ZERO_HASH, 1);
        let hash = block.hash();
        assert!(!store.has(hash).unwrap());

        let mut batch = WriteBatch::default();
        store.insert_batch(&mut batch, hash, Arc::new(block.clone())).unwrap();
        // Nothing reaches the db before the batch is written
        assert!(!view(&db, |view| store.has_in_view(view, hash)).unwrap());
        db.write(batch).unwrap();

        assert!(store.has(hash).unwrap());
        assert_eq!(store.get_header(hash).unwrap(), block.header);
        assert!(view(&db, |view| store.has_in_view(view, hash)).unwrap());
        assert!(!view(&db, |view| store.has_in_view(view, 9.into())).unwrap());

        let mut batch = WriteBatch::default();
        assert!(matches!(
            store.insert_batch(&mut batch, hash, Arc::new(block.clone())),
            Err(StoreError::HashAlreadyExists(h)) if h == hash
        ));

        // A fresh cache reads through the db
        let uncached = DbBlocksStore::new(db, CachePolicy::Empty);
        assert_eq!(uncached.get_header(hash).unwrap(), block.header);
    }

    #[test]
    fn test_dropped_batch_can_be_retried() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10)).unwrap();
        let store = DbBlocksStore::new(db.clone(), CachePolicy::Count(10));
        let block = block_with_parent(ZERO_HASH, 2);
        let hash = block.hash();

        let mut batch = WriteBatch::default();
        store.insert_batch(&mut batch, hash, Arc::new(block.clone())).unwrap();
        drop(batch);

        assert!(!store.has(hash).unwrap());
        assert!(matches!(store.get_header(hash), Err(StoreError::KeyNotFound(_))));

        let mut batch = WriteBatch::default();
        store.insert_batch(&mut batch, hash, Arc::new(block.clone())).unwrap();
        db.write(batch).unwrap();
        assert_eq!(store.get_header(hash).unwrap(), block.header);
    }
}
