use czz_consensus_core::block::Block;
use czz_core::{debug, time::unix_now};
use czz_hashes::Hash;
use indexmap::IndexMap;
use std::{collections::HashMap, num::NonZeroUsize};

/// A block whose parent is not known yet
#[derive(Debug, Clone)]
pub struct OrphanBlock {
    pub block: Block,
    /// Unix time in milliseconds after which the orphan may be dropped
    pub expiration: u64,
}

/// Orphan blocks indexed by their own hash and by the hash of their declared parent.
///
/// Every buffered orphan sits in exactly one parent bucket, and both indexes are always
/// updated together. Buckets keep insertion order.
pub struct OrphanBlocksPool {
    // Insertion ordered, so the first entry is the oldest
    orphans: IndexMap<Hash, OrphanBlock>,
    prev_orphans: HashMap<Hash, Vec<Hash>>,
    max_orphans: NonZeroUsize,
    expiration: u64,
}

impl OrphanBlocksPool {
    pub fn new(max_orphans: NonZeroUsize, expiration: u64) -> Self {
        Self { orphans: IndexMap::new(), prev_orphans: HashMap::new(), max_orphans, expiration }
    }

    pub fn len(&self) -> usize {
        self.orphans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty()
    }

    pub fn is_known_orphan(&self, hash: Hash) -> bool {
        self.orphans.contains_key(&hash)
    }

    pub fn get(&self, hash: Hash) -> Option<&OrphanBlock> {
        self.orphans.get(&hash)
    }

    /// Walks parent links through the pool and returns the furthest buffered ancestor of `hash`,
    /// which is the block whose parent is missing. Returns `hash` itself if it is not an orphan.
    pub fn orphan_root(&self, hash: Hash) -> Hash {
        let mut root = hash;
        while let Some(orphan) = self.orphans.get(&root) {
            let parent = orphan.block.prev_block();
            if !self.orphans.contains_key(&parent) {
                break;
            }
            root = parent;
        }
        root
    }

    /// Buffers `block` until its parent arrives, making room for it by dropping expired
    /// orphans and then the oldest one if needed
    pub fn add_orphan(&mut self, block: Block) {
        self.add_orphan_at(block, unix_now())
    }

    fn add_orphan_at(&mut self, block: Block, now: u64) {
        let hash = block.hash();
        self.remove_orphan(hash);
        self.remove_expired(now);

        if self.orphans.len() >= self.max_orphans.get()
            && let Some((&oldest, _)) = self.orphans.first()
        {
            debug!("Orphan pool is full, evicting block {}", oldest);
            self.remove_orphan(oldest);
        }

        let parent = block.prev_block();
        self.orphans.insert(hash, OrphanBlock { block, expiration: now.saturating_add(self.expiration) });
        self.prev_orphans.entry(parent).or_default().push(hash);
    }

    /// Removes `hash` from both indexes, keeping the order of its siblings. Removing an
    /// unknown hash is a no-op.
    pub fn remove_orphan(&mut self, hash: Hash) -> Option<OrphanBlock> {
        let orphan = self.orphans.shift_remove(&hash)?;
        let parent = orphan.block.prev_block();
        if let Some(siblings) = self.prev_orphans.get_mut(&parent) {
            siblings.retain(|sibling| *sibling != hash);
            if siblings.is_empty() {
                self.prev_orphans.remove(&parent);
            }
        }
        Some(orphan)
    }

    fn remove_expired(&mut self, now: u64) {
        let expired = self.orphans.iter().filter(|(_, orphan)| orphan.expiration < now).map(|(hash, _)| *hash).collect::<Vec<_>>();
        for hash in expired {
            debug!("Removing expired orphan block {}", hash);
            self.remove_orphan(hash);
        }
    }

    /// The hash at position `index` of the bucket of orphans declaring `parent` as their parent.
    /// The bucket is read afresh on each call, so removals take effect immediately.
    pub fn child_at(&self, parent: Hash, index: usize) -> Option<Hash> {
        self.prev_orphans.get(&parent).and_then(|children| children.get(index)).copied()
    }

    pub fn children(&self, parent: Hash) -> &[Hash] {
        self.prev_orphans.get(&parent).map(Vec::as_slice).unwrap_or_default()
    }

    /// Leaves a bucket slot without a backing entry
    #[cfg(test)]
    pub(crate) fn insert_dangling(&mut self, parent: Hash, hash: Hash) {
        self.prev_orphans.entry(parent).or_default().push(hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::block_with_parent;

    fn pool_size(size: usize) -> NonZeroUsize {
        NonZeroUsize::new(size).unwrap()
    }

    #[test]
    fn test_add_and_remove() {
        let mut pool = OrphanBlocksPool::new(pool_size(10), 1000);
        let parent = Hash::from(1u64);
        let first = block_with_parent(parent, 1);
        let second = block_with_parent(parent, 2);
        let third = block_with_parent(parent, 3);

        for block in [&first, &second, &third] {
            pool.add_orphan_at(block.clone(), 0);
        }
        assert_eq!(pool.len(), 3);
        assert!(pool.is_known_orphan(second.hash()));
        assert_eq!(pool.get(first.hash()).unwrap().expiration, 1000);
        assert_eq!(pool.children(parent), &[first.hash(), second.hash(), third.hash()]);

        // Siblings keep their relative order
        assert!(pool.remove_orphan(second.hash()).is_some());
        assert_eq!(pool.children(parent), &[first.hash(), third.hash()]);
        assert_eq!(pool.child_at(parent, 1), Some(third.hash()));
        assert_eq!(pool.child_at(parent, 2), None);

        // Idempotent
        assert!(pool.remove_orphan(second.hash()).is_none());
        assert_eq!(pool.len(), 2);

        pool.remove_orphan(first.hash());
        pool.remove_orphan(third.hash());
        assert!(pool.is_empty());
        assert!(pool.children(parent).is_empty());
        assert_eq!(pool.child_at(parent, 0), None);
    }

    #[test]
    fn test_re_adding_does_not_duplicate_slots() {
        let mut pool = OrphanBlocksPool::new(pool_size(10), 1000);
        let block = block_with_parent(1.into(), 1);
        pool.add_orphan_at(block.clone(), 0);
        pool.add_orphan_at(block.clone(), 5);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.children(1.into()), &[block.hash()]);
        assert_eq!(pool.get(block.hash()).unwrap().expiration, 1005);
    }

    #[test]
    fn test_expired_orphans_are_dropped() {
        let mut pool = OrphanBlocksPool::new(pool_size(10), 100);
        let stale = block_with_parent(1.into(), 1);
        let fresh = block_with_parent(2.into(), 2);
        pool.add_orphan_at(stale.clone(), 0);
        pool.add_orphan_at(fresh.clone(), 50);

        // Expiry is exclusive
        let late = block_with_parent(3.into(), 3);
        pool.add_orphan_at(late.clone(), 100);
        assert!(pool.is_known_orphan(stale.hash()));

        let later = block_with_parent(3.into(), 4);
        pool.add_orphan_at(later.clone(), 101);
        assert!(!pool.is_known_orphan(stale.hash()));
        assert!(pool.children(1.into()).is_empty());
        assert!(pool.is_known_orphan(fresh.hash()));
        assert_eq!(pool.children(3.into()), &[late.hash(), later.hash()]);
    }

    #[test]
    fn test_oldest_orphan_is_evicted_when_full() {
        let mut pool = OrphanBlocksPool::new(pool_size(2), 1000);
        let blocks = (1..=3).map(|nonce| block_with_parent(1.into(), nonce)).collect::<Vec<_>>();
        for block in blocks.iter() {
            pool.add_orphan_at(block.clone(), 0);
        }
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_known_orphan(blocks[0].hash()));
        assert_eq!(pool.children(1.into()), &[blocks[1].hash(), blocks[2].hash()]);

        // With room for a single orphan the newest one always stays buffered
        let mut single = OrphanBlocksPool::new(NonZeroUsize::MIN, 1000);
        for block in blocks.iter() {
            single.add_orphan_at(block.clone(), 0);
            assert!(single.is_known_orphan(block.hash()));
        }
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_orphan_root() {
        let mut pool = OrphanBlocksPool::new(pool_size(10), 1000);
        let missing = Hash::from(9u64);
        let a = block_with_parent(missing, 1);
        let b = block_with_parent(a.hash(), 2);
        let c = block_with_parent(b.hash(), 3);
        pool.add_orphan_at(a.clone(), 0);
        pool.add_orphan_at(b.clone(), 0);
        pool.add_orphan_at(c.clone(), 0);

        assert_eq!(pool.orphan_root(c.hash()), a.hash());
        assert_eq!(pool.orphan_root(a.hash()), a.hash());
        assert_eq!(pool.orphan_root(missing), missing);

        pool.remove_orphan(a.hash());
        assert_eq!(pool.orphan_root(c.hash()), b.hash());
    }
}
