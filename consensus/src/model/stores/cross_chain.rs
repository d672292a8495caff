use crate::{
    errors::BlockProcessResult,
    model::services::cross_chain::{CollateralStateProvider, EntangleStateProvider},
};
use czz_consensus_core::{
    BlockHeight,
    cross::{CollateralState, EntangleState},
};
use czz_database::prelude::{CachePolicy, CachedDbAccess, DB, DirectDbWriter, StoreError, StoreResult, StoreResultExtensions};
use czz_database::registry::DatabaseStorePrefixes;
use czz_hashes::Hash;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// A cross-chain snapshot along with the height of the block it belongs to
#[derive(Clone, Debug, Serialize, Deserialize)]
struct HeightTagged<T> {
    height: BlockHeight,
    state: Arc<T>,
}

/// Per-block cross-chain snapshots, keyed by block hash
#[derive(Clone)]
struct CrossChainSnapshots<T: Clone + Send + Sync> {
    db: Arc<DB>,
    access: CachedDbAccess<Hash, HeightTagged<T>>,
}

impl<T> CrossChainSnapshots<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned,
{
    fn new(db: Arc<DB>, cache_policy: CachePolicy, prefix: DatabaseStorePrefixes) -> Self {
        Self { db: Arc::clone(&db), access: CachedDbAccess::new(db, cache_policy, prefix.into()) }
    }

    fn get(&self, hash: Hash, height: BlockHeight) -> StoreResult<Option<Arc<T>>> {
        let Some(tagged) = self.access.read(hash).optional()? else {
            return Ok(None);
        };
        if tagged.height != height {
            return Err(StoreError::DataInconsistency(format!(
                "snapshot of block {} is stored for height {} but was requested for height {}",
                hash, tagged.height, height
            )));
        }
        Ok(Some(tagged.state))
    }

    fn insert(&self, hash: Hash, height: BlockHeight, state: Arc<T>) -> StoreResult<()> {
        self.access.write(DirectDbWriter::new(&self.db), hash, HeightTagged { height, state })
    }
}

/// Materialized entangle states of blocks past the conversion height
#[derive(Clone)]
pub struct DbEntangleStateStore {
    inner: CrossChainSnapshots<EntangleState>,
}

impl DbEntangleStateStore {
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy) -> Self {
        Self { inner: CrossChainSnapshots::new(db, cache_policy, DatabaseStorePrefixes::EntangleStates) }
    }

    pub fn get(&self, hash: Hash, height: BlockHeight) -> StoreResult<Option<Arc<EntangleState>>> {
        self.inner.get(hash, height)
    }

    pub fn insert(&self, hash: Hash, height: BlockHeight, state: Arc<EntangleState>) -> StoreResult<()> {
        self.inner.insert(hash, height, state)
    }
}

impl EntangleStateProvider for DbEntangleStateStore {
    fn entangle_state(&self, hash: Hash, height: BlockHeight) -> BlockProcessResult<Option<EntangleState>> {
        Ok(self.get(hash, height)?.map(|state| state.as_ref().clone()))
    }
}

/// Pledge snapshots recorded by the collateral subsystem
#[derive(Clone)]
pub struct DbCollateralStateStore {
    inner: CrossChainSnapshots<CollateralState>,
}

impl DbCollateralStateStore {
    pub fn new(db: Arc<DB>, cache_policy: CachePolicy) -> Self {
        Self { inner: CrossChainSnapshots::new(db, cache_policy, DatabaseStorePrefixes::CollateralStates) }
    }

    pub fn get(&self, hash: Hash, height: BlockHeight) -> StoreResult<Option<Arc<CollateralState>>> {
        self.inner.get(hash, height)
    }

    pub fn insert(&self, hash: Hash, height: BlockHeight, state: Arc<CollateralState>) -> StoreResult<()> {
        self.inner.insert(hash, height, state)
    }
}

impl CollateralStateProvider for DbCollateralStateStore {
    fn collateral_state(&self, hash: Hash, height: BlockHeight) -> BlockProcessResult<Option<CollateralState>> {
        Ok(self.get(hash, height)?.map(|state| state.as_ref().clone()))
    }
}
