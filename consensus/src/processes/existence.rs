use crate::consensus::storage::ChainStorage;
use czz_consensus_core::BlockHeight;
use czz_database::prelude::{StoreResult, StoreResultExtensions, view};
use czz_hashes::Hash;
use std::sync::Arc;

/// What the chain knows about a block hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockExistence {
    /// Present in the in-memory block index
    Indexed,
    /// Persisted on the main chain at the given height
    MainChain(BlockHeight),
    /// Persisted, but without main chain height. Side chain topology is not persisted
    /// so such a block cannot be placed and is considered unknown.
    SideChainUnresolvable,
    NotFound,
}

impl BlockExistence {
    pub fn exists(self) -> bool {
        matches!(self, BlockExistence::Indexed | BlockExistence::MainChain(_))
    }
}

/// Answers whether a block is already known, consulting the in-memory index before the database.
/// Takes no chain lock, so concurrent readers may observe a state preceding an in-flight acceptance.
#[derive(Clone)]
pub struct ExistenceOracle {
    storage: Arc<ChainStorage>,
}

impl ExistenceOracle {
    pub fn new(storage: Arc<ChainStorage>) -> Self {
        Self { storage }
    }

    pub fn block_existence(&self, hash: Hash) -> StoreResult<BlockExistence> {
        if self.storage.block_index.have_block(hash) {
            return Ok(BlockExistence::Indexed);
        }

        // Both lookups must observe the same committed state
        view(self.storage.db(), |view| {
            if !self.storage.blocks_store.has_in_view(view, hash)? {
                return Ok(BlockExistence::NotFound);
            }
            match self.storage.chain_index_store.read().height_in_view(view, hash).optional()? {
                Some(height) => Ok(BlockExistence::MainChain(height)),
                None => Ok(BlockExistence::SideChainUnresolvable),
            }
        })
    }

    pub fn block_exists(&self, hash: Hash) -> StoreResult<bool> {
        Ok(self.block_existence(hash)?.exists())
    }
}
