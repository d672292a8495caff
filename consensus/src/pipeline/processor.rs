use crate::{
    consensus::{services::BlockChainServices, storage::ChainStorage},
    errors::{BlockProcessResult, RuleError},
    model::{
        services::validation::SanityContext,
        stores::{blocks::BlockStoreReader, chain_index::ChainIndexStoreReader},
    },
    processes::{
        entangle::EntangleStateSelector,
        existence::{BlockExistence, ExistenceOracle},
        orphans::OrphanBlocksPool,
    },
};
use czz_consensus_core::{BlockHeight, block::Block, config::Config, flags::BehaviorFlags, header::Header};
use czz_core::{debug, info, time::Stopwatch, trace, warn};
use czz_database::prelude::StoreResult;
use czz_hashes::Hash;
use czz_txscript::extract_script_pub_key_address;
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

/// Where a processed block ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockProcessOutcome {
    MainChain,
    SideChain,
    /// Buffered until its parent arrives
    Orphan,
}

impl BlockProcessOutcome {
    pub fn is_main_chain(self) -> bool {
        matches!(self, BlockProcessOutcome::MainChain)
    }

    pub fn is_orphan(self) -> bool {
        matches!(self, BlockProcessOutcome::Orphan)
    }
}

/// Chain state mutated by block processing. Only reachable through the chain lock.
struct ChainState {
    orphans: OrphanBlocksPool,
}

pub struct BlockChain {
    // Config
    config: Arc<Config>,

    // Storage
    storage: Arc<ChainStorage>,

    // Managers and services
    existence: ExistenceOracle,
    entangle_selector: EntangleStateSelector,
    services: BlockChainServices,

    // Chain lock, held for the full duration of processing a block
    chain_lock: Mutex<ChainState>,
}

impl BlockChain {
    pub fn new(config: Arc<Config>, storage: Arc<ChainStorage>, services: BlockChainServices) -> Self {
        let existence = ExistenceOracle::new(storage.clone());
        let entangle_selector = EntangleStateSelector::new(
            config.params.clone(),
            services.collateral_provider.clone(),
            services.entangle_provider.clone(),
        );
        let orphans = OrphanBlocksPool::new(config.max_orphan_blocks, config.orphan_expiration);
        Self { config, storage, existence, entangle_selector, services, chain_lock: Mutex::new(ChainState { orphans }) }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn storage(&self) -> &Arc<ChainStorage> {
        &self.storage
    }

    /// Runs `block` through the acceptance pipeline: duplicate detection, sanity checks, orphan
    /// buffering or acceptance, then acceptance of the orphans which were waiting on it.
    ///
    /// An unknown parent is not an error, the block is buffered and [`BlockProcessOutcome::Orphan`]
    /// is returned. If accepting a dependent orphan fails the error is returned, but the blocks
    /// accepted so far, `block` included, stay accepted.
    pub fn process_block(&self, block: Block, flags: BehaviorFlags) -> BlockProcessResult<BlockProcessOutcome> {
        let mut state = self.chain_lock.lock();
        let _sw = Stopwatch::<500>::with_threshold("process_block op");

        let block_hash = block.hash();
        trace!("Processing block {}", block_hash);

        if !flags.has_flag(BehaviorFlags::NO_DUP_BLOCK_CHECK) {
            if self.existence.block_exists(block_hash)? {
                return Err(RuleError::DuplicateBlock { hash: block_hash, orphan: false }.into());
            }
            if state.orphans.is_known_orphan(block_hash) {
                return Err(RuleError::DuplicateBlock { hash: block_hash, orphan: true }.into());
            }
        }

        // Every block is validated by the magnetic anomaly rule set
        let flags = flags | BehaviorFlags::MAGNETIC_ANOMALY;

        // Header and height of a parent which is not fully known are treated as unknown
        let prev_hash = block.prev_block();
        let prev_exists = self.existence.block_exists(prev_hash)?;
        let prev_header = self.header_by_hash(prev_hash).ok();
        let prev_height = self.block_height_by_hash(prev_hash).unwrap_or_default();
        let block_height = prev_height + 1;

        // No snapshot can belong to an unknown parent
        let entangle_state = if prev_exists { self.entangle_selector.select(prev_hash, prev_height)? } else { None };
        let coinbase_address = block.coinbase_script().and_then(|script| extract_script_pub_key_address(script, self.config.prefix).ok());

        let ctx = SanityContext {
            params: &self.config.params,
            prev_header: prev_header.as_ref(),
            pow_limit_bits: self.config.pow_limit_bits,
            time_source: self.services.time_source.as_ref(),
            flags,
            entangle_state: entangle_state.as_ref(),
            coinbase_address: coinbase_address.as_ref(),
        };
        self.services.sanity_checker.check_block_sanity(&block, &ctx)?;

        if !prev_exists {
            info!("Adding orphan block {} with parent {}", block_hash, prev_hash);
            state.orphans.add_orphan(block);
            return Ok(BlockProcessOutcome::Orphan);
        }

        if self.config.is_beacon_window(block_height) {
            self.services.cross_chain_checker.check_beacon(&block, prev_height)?;
        }
        if self.config.is_converted(block_height) {
            self.services.cross_chain_checker.check_block_cross_tx(&block, prev_height)?;
        }

        let is_main_chain = self.services.acceptor.maybe_accept_block(&block, flags)?;

        self.process_orphans(&mut state, block_hash, flags)?;

        debug!("Accepted block {}", block_hash);
        Ok(if is_main_chain { BlockProcessOutcome::MainChain } else { BlockProcessOutcome::SideChain })
    }

    /// Accepts the orphans depending on `hash`, breadth first, and then theirs in turn.
    /// Siblings are processed in the order they were buffered.
    fn process_orphans(&self, state: &mut ChainState, hash: Hash, flags: BehaviorFlags) -> BlockProcessResult<()> {
        let mut queue = VecDeque::from([hash]);
        while let Some(parent) = queue.pop_front() {
            // Accepted orphans leave the bucket, so the index only moves past dangling slots
            let mut i = 0;
            while let Some(orphan_hash) = state.orphans.child_at(parent, i) {
                let Some(orphan) = state.orphans.remove_orphan(orphan_hash) else {
                    warn!("Found a dangling entry at index {} in the orphan dependency list for block {}", i, parent);
                    i += 1;
                    continue;
                };
                self.services.acceptor.maybe_accept_block(&orphan.block, flags)?;
                debug!("Accepted orphan block {} with parent {}", orphan_hash, parent);
                queue.push_back(orphan_hash);
            }
        }
        Ok(())
    }

    /// Header of a block known to the chain
    pub fn header_by_hash(&self, hash: Hash) -> StoreResult<Header> {
        if let Some(node) = self.storage.block_index.lookup(hash) {
            return Ok(node.header.as_ref().clone());
        }
        self.storage.blocks_store.get_header(hash)
    }

    /// Height of a block in the block index or on the persisted main chain
    pub fn block_height_by_hash(&self, hash: Hash) -> StoreResult<BlockHeight> {
        if let Some(node) = self.storage.block_index.lookup(hash) {
            return Ok(node.height);
        }
        self.storage.chain_index_store.read().get_height(hash)
    }

    pub fn block_existence(&self, hash: Hash) -> StoreResult<BlockExistence> {
        self.existence.block_existence(hash)
    }

    pub fn block_exists(&self, hash: Hash) -> StoreResult<bool> {
        self.existence.block_exists(hash)
    }

    pub fn is_known_orphan(&self, hash: Hash) -> bool {
        self.chain_lock.lock().orphans.is_known_orphan(hash)
    }

    /// The furthest buffered ancestor of `hash`, whose parent is the block to request
    pub fn orphan_root(&self, hash: Hash) -> Hash {
        self.chain_lock.lock().orphans.orphan_root(hash)
    }

    pub fn orphan_count(&self) -> usize {
        self.chain_lock.lock().orphans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::test_chain::TestChain;
    use crate::test_helpers::block_with_parent;

    #[test]
    fn test_dangling_orphan_slots_are_skipped() {
        let test_chain = TestChain::with_simnet();
        let genesis = test_chain.genesis_hash();
        let a = block_with_parent(genesis, 1);
        let b = block_with_parent(a.hash(), 2);
        let c = block_with_parent(a.hash(), 3);

        assert!(test_chain.process_block(b.clone()).unwrap().is_orphan());
        {
            let mut state = test_chain.chain.chain_lock.lock();
            state.orphans.insert_dangling(a.hash(), Hash::from(99u64));
        }
        assert!(test_chain.process_block(c.clone()).unwrap().is_orphan());

        assert!(test_chain.process_block(a.clone()).unwrap().is_main_chain());
        assert_eq!(test_chain.acceptor.accepted(), vec![a.hash(), b.hash(), c.hash()]);
        assert_eq!(test_chain.chain.orphan_count(), 0);

        // The dangling slot is left behind untouched
        let state = test_chain.chain.chain_lock.lock();
        assert_eq!(state.orphans.children(a.hash()), &[Hash::from(99u64)]);
    }
}
