use crate::model::{
    block_index::BlockIndex,
    stores::{
        DB,
        blocks::DbBlocksStore,
        chain_index::DbChainIndexStore,
        cross_chain::{DbCollateralStateStore, DbEntangleStateStore},
    },
};
use czz_consensus_core::config::Config;
use czz_database::prelude::CachePolicy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Chain index entries are small, so they get a larger cache than full blocks
const CHAIN_INDEX_CACHE_FACTOR: usize = 4;

/// Cross-chain snapshots are only read for the parent of the block being processed
const CROSS_CHAIN_CACHE_SIZE: usize = 64;

pub struct ChainStorage {
    // DB
    db: Arc<DB>,

    // In-memory index
    pub block_index: Arc<BlockIndex>,

    // Locked stores
    pub chain_index_store: Arc<RwLock<DbChainIndexStore>>,

    // Append-only stores
    pub blocks_store: Arc<DbBlocksStore>,

    // Cross-chain stores
    pub entangle_store: Arc<DbEntangleStateStore>,
    pub collateral_store: Arc<DbCollateralStateStore>,
}

impl ChainStorage {
    pub fn new(db: Arc<DB>, config: &Config) -> Arc<Self> {
        let block_cache_policy = CachePolicy::Count(config.block_cache_size);
        let chain_index_cache_policy = CachePolicy::Count(config.block_cache_size.saturating_mul(CHAIN_INDEX_CACHE_FACTOR));
        let cross_chain_cache_policy = CachePolicy::Count(CROSS_CHAIN_CACHE_SIZE);

        Arc::new(Self {
            db: db.clone(),
            block_index: Arc::new(BlockIndex::new()),
            chain_index_store: Arc::new(RwLock::new(DbChainIndexStore::new(db.clone(), chain_index_cache_policy))),
            blocks_store: Arc::new(DbBlocksStore::new(db.clone(), block_cache_policy)),
            entangle_store: Arc::new(DbEntangleStateStore::new(db.clone(), cross_chain_cache_policy)),
            collateral_store: Arc::new(DbCollateralStateStore::new(db, cross_chain_cache_policy)),
        })
    }

    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }
}
