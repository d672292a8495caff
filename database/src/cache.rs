use indexmap::IndexMap;
use parking_lot::RwLock;
use rand::Rng;
use std::{collections::hash_map::RandomState, hash::BuildHasher, sync::Arc};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CachePolicy {
    /// Nothing is cached
    Empty,
    /// Holds at most this many entries, evicting a random one when full
    Count(usize),
}

impl CachePolicy {
    fn max_size(&self) -> usize {
        match self {
            CachePolicy::Empty => 0,
            CachePolicy::Count(size) => *size,
        }
    }
}

#[derive(Clone)]
pub struct Cache<TKey, TData, S = RandomState>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync,
{
    // We use IndexMap and not HashMap because it makes it cheaper to remove a random element when the cache is full.
    map: Arc<RwLock<IndexMap<TKey, TData, S>>>,
    max_size: usize,
}

impl<TKey, TData, S> Cache<TKey, TData, S>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync,
    S: BuildHasher + Default,
{
    pub fn new(policy: CachePolicy) -> Self {
        let max_size = policy.max_size();
        // Use `size + 1` for not triggering a realloc if new element exactly overflows capacity
        Self { map: Arc::new(RwLock::new(IndexMap::with_capacity_and_hasher(max_size + 1, S::default()))), max_size }
    }

    pub fn get(&self, key: &TKey) -> Option<TData> {
        self.map.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &TKey) -> bool {
        self.map.read().contains_key(key)
    }

    pub fn insert(&self, key: TKey, data: TData) {
        if self.max_size == 0 {
            return;
        }
        let mut map = self.map.write();
        if map.len() == self.max_size && !map.contains_key(&key) {
            map.swap_remove_index(rand::thread_rng().gen_range(0..self.max_size));
        }
        map.insert(key, data);
    }

    pub fn remove(&self, key: &TKey) -> Option<TData> {
        if self.max_size == 0 {
            return None;
        }
        self.map.write().swap_remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_policy_bound() {
        let cache = Cache::<u64, u64>::new(CachePolicy::Count(4));
        for i in 0..32 {
            cache.insert(i, i * 2);
        }
        assert_eq!((0..32).filter(|i| cache.contains_key(i)).count(), 4);
        // The most recent insert always survives eviction
        assert_eq!(cache.get(&31), Some(62));

        // Overwriting an existing key never evicts
        cache.insert(31, 0);
        assert_eq!((0..32).filter(|i| cache.contains_key(i)).count(), 4);
        assert_eq!(cache.get(&31), Some(0));

        assert_eq!(cache.remove(&31), Some(0));
        assert!(!cache.contains_key(&31));
    }

    #[test]
    fn test_empty_policy() {
        let cache = Cache::<u64, u64>::new(CachePolicy::Empty);
        cache.insert(1, 1);
        assert!(!cache.contains_key(&1));
        assert_eq!(cache.remove(&1), None);
    }
}
