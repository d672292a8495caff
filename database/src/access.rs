use crate::{cache::CachePolicy, db::DB, errors::StoreError, view::DbView};

use super::prelude::{Cache, DbKey, DbWriter};
use serde::{Serialize, de::DeserializeOwned};
use std::{collections::hash_map::RandomState, hash::BuildHasher, sync::Arc};

/// A concurrent DB store access with typed caching.
#[derive(Clone)]
pub struct CachedDbAccess<TKey, TData, S = RandomState>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync,
{
    db: Arc<DB>,

    // Cache
    cache: Cache<TKey, TData, S>,

    // DB bucket/path
    prefix: Vec<u8>,
}

impl<TKey, TData, S> CachedDbAccess<TKey, TData, S>
where
    TKey: Clone + std::hash::Hash + Eq + Send + Sync,
    TData: Clone + Send + Sync,
    S: BuildHasher + Default,
{
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy, prefix: Vec<u8>) -> Self {
        Self { db, cache: Cache::new(cache_policy), prefix }
    }

    pub fn has(&self, key: TKey) -> Result<bool, StoreError>
    where
        TKey: AsRef<[u8]>,
    {
        Ok(self.cache.contains_key(&key) || self.db.get_pinned(DbKey::new(&self.prefix, key))?.is_some())
    }

    pub fn read(&self, key: TKey) -> Result<TData, StoreError>
    where
        TKey: AsRef<[u8]>,
        TData: DeserializeOwned, // We need `DeserializeOwned` since the slice coming from `db.get_pinned` has short lifetime
    {
        if let Some(data) = self.cache.get(&key) {
            Ok(data)
        } else {
            let db_key = DbKey::new(&self.prefix, key.clone());
            if let Some(slice) = self.db.get_pinned(&db_key)? {
                let data: TData = bincode::deserialize(&slice)?;
                self.cache.insert(key, data.clone());
                Ok(data)
            } else {
                Err(StoreError::KeyNotFound(db_key))
            }
        }
    }

    /// Checks presence as of the snapshot behind `view`. The cache is bypassed since
    /// it may hold entries newer than the snapshot.
    pub fn has_in_view(&self, view: &DbView<'_>, key: TKey) -> Result<bool, StoreError>
    where
        TKey: AsRef<[u8]>,
    {
        view.has(DbKey::new(&self.prefix, key))
    }

    /// Reads as of the snapshot behind `view`, bypassing the cache
    pub fn read_in_view(&self, view: &DbView<'_>, key: TKey) -> Result<TData, StoreError>
    where
        TKey: AsRef<[u8]>,
        TData: DeserializeOwned,
    {
        let db_key = DbKey::new(&self.prefix, key);
        match view.get(&db_key)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Err(StoreError::KeyNotFound(db_key)),
        }
    }

    /// Writes `data` under `key`. The cache only takes the value once the write is visible in the db,
    /// so a staged batch evicts the key instead and a dropped batch leaves no trace.
    pub fn write<W: DbWriter>(&self, mut writer: W, key: TKey, data: TData) -> Result<(), StoreError>
    where
        TKey: AsRef<[u8]>,
        TData: Serialize,
    {
        let bin_data = bincode::serialize(&data)?;
        writer.put(DbKey::new(&self.prefix, key.clone()), bin_data)?;
        if W::COMMITS_ON_PUT {
            self.cache.insert(key, data);
        } else {
            self.cache.remove(&key);
        }
        Ok(())
    }
}
