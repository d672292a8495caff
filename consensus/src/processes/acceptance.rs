use crate::{
    consensus::storage::ChainStorage,
    errors::{BlockProcessResult, RuleError},
    model::{
        block_index::BlockNode,
        services::acceptance::ChainAcceptor,
        stores::{
            blocks::BlockStoreReader,
            chain_index::{ChainIndexStore, ChainIndexStoreReader},
        },
    },
};
use czz_consensus_core::{block::Block, flags::BehaviorFlags};
use czz_core::trace;
use czz_database::prelude::{StoreError, StoreResult, StoreResultExtensions};
use czz_hashes::Hash;
use rocksdb::WriteBatch;
use std::sync::Arc;

/// Connects blocks by parent height only. A block extends the main chain iff its parent is
/// the current tip, any other block is kept as a side chain block. Competing branches are
/// never reorganized.
pub struct IndexAcceptor {
    storage: Arc<ChainStorage>,
}

impl IndexAcceptor {
    pub fn new(storage: Arc<ChainStorage>) -> Self {
        Self { storage }
    }

    /// Seeds an empty chain with `genesis`. A chain already seeded with the same genesis is left untouched.
    pub fn init_genesis(&self, genesis: &Block) -> StoreResult<()> {
        let mut chain_index = self.storage.chain_index_store.write();
        if let Some(stored) = chain_index.get_hash(0).optional()? {
            if stored != genesis.hash() {
                return Err(StoreError::DataInconsistency(format!(
                    "the stored genesis {} differs from the configured genesis {}",
                    stored,
                    genesis.hash()
                )));
            }
            return Ok(());
        }

        let mut batch = WriteBatch::default();
        self.storage.blocks_store.insert_batch(&mut batch, genesis.hash(), Arc::new(genesis.clone()))?;
        chain_index.extend_batch(&mut batch, genesis.hash(), 0)?;
        self.storage.db().write(batch)?;
        self.storage.block_index.insert(Arc::new(genesis.header.clone()), 0);
        Ok(())
    }

    /// Locates a parent in the block index, falling back to the persisted main chain
    fn lookup_parent(&self, hash: Hash) -> StoreResult<Option<BlockNode>> {
        if let Some(node) = self.storage.block_index.lookup(hash) {
            return Ok(Some(node));
        }
        let Some(height) = self.storage.chain_index_store.read().get_height(hash).optional()? else {
            return Ok(None);
        };
        let header = self.storage.blocks_store.get_header(hash)?;
        let node = BlockNode { header: Arc::new(header), height };
        self.storage.block_index.insert(node.header.clone(), height);
        Ok(Some(node))
    }
}

impl ChainAcceptor for IndexAcceptor {
    fn maybe_accept_block(&self, block: &Block, _flags: BehaviorFlags) -> BlockProcessResult<bool> {
        let hash = block.hash();
        let parent = block.prev_block();
        let Some(parent_node) = self.lookup_parent(parent)? else {
            return Err(RuleError::MissingParent(parent).into());
        };
        let height = parent_node.height + 1;

        let mut chain_index = self.storage.chain_index_store.write();
        let is_main_chain = chain_index.get_tip().optional()?.is_some_and(|tip| tip.hash == parent);

        let mut batch = WriteBatch::default();
        self.storage.blocks_store.insert_batch(&mut batch, hash, Arc::new(block.clone()))?;
        if is_main_chain {
            chain_index.extend_batch(&mut batch, hash, height)?;
        }
        self.storage.db().write(batch).map_err(StoreError::from)?;
        drop(chain_index);

        self.storage.block_index.insert(Arc::new(block.header.clone()), height);
        trace!("Connected block {} at height {} (main chain: {})", hash, height, is_main_chain);
        Ok(is_main_chain)
    }
}
