use crate::{db::DB, errors::StoreError};

use super::prelude::{DbKey, DbWriter};
use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// A cached DB item with concurrency support
#[derive(Clone)]
pub struct CachedDbItem<T> {
    db: Arc<DB>,
    key: Vec<u8>,
    cached_item: Arc<RwLock<Option<T>>>,
}

impl<T> CachedDbItem<T> {
    pub fn new(db: Arc<DB>, key: Vec<u8>) -> Self {
        Self { db, key, cached_item: Arc::new(RwLock::new(None)) }
    }

    pub fn read(&self) -> Result<T, StoreError>
    where
        T: Clone + DeserializeOwned,
    {
        if let Some(item) = self.cached_item.read().clone() {
            return Ok(item);
        }
        if let Some(slice) = self.db.get_pinned(&self.key)? {
            let item: T = bincode::deserialize(&slice)?;
            *self.cached_item.write() = Some(item.clone());
            Ok(item)
        } else {
            Err(StoreError::KeyNotFound(DbKey::prefix_only(&self.key)))
        }
    }

    /// Writes `item`. Like [`CachedDbAccess::write`](crate::prelude::CachedDbAccess::write), a staged
    /// write clears the cached value rather than exposing an item the db may never receive.
    pub fn write<W: DbWriter>(&mut self, mut writer: W, item: &T) -> Result<(), StoreError>
    where
        T: Clone + Serialize,
    {
        let bin_data = bincode::serialize(item)?;
        writer.put(&self.key, bin_data)?;
        *self.cached_item.write() = if W::COMMITS_ON_PUT { Some(item.clone()) } else { None };
        Ok(())
    }
}
