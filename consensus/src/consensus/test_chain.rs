use super::{services::BlockChainServices, storage::ChainStorage};
use crate::{
    errors::BlockProcessResult,
    pipeline::{BlockChain, BlockProcessOutcome},
    processes::acceptance::IndexAcceptor,
    test_helpers::{
        CountingCollateralProvider, CountingEntangleProvider, RecordingAcceptor, RecordingCrossChainChecker, RecordingSanityChecker,
        sample_collateral_state, sample_entangle_state,
    },
};
use czz_consensus_core::{
    block::Block,
    config::{Config, params::SIMNET_PARAMS},
    flags::BehaviorFlags,
};
use czz_core::time::SystemTimeSource;
use czz_database::{create_temp_db, prelude::ConnBuilder, utils::DbLifetime};
use czz_hashes::Hash;
use std::sync::Arc;

/// A chain over a temporary database, wired with recording collaborators and an
/// [`IndexAcceptor`] seeded with the network genesis
pub struct TestChain {
    pub chain: BlockChain,
    pub sanity_checker: Arc<RecordingSanityChecker>,
    pub cross_chain_checker: Arc<RecordingCrossChainChecker>,
    pub acceptor: Arc<RecordingAcceptor>,
    pub collateral_provider: Arc<CountingCollateralProvider>,
    pub entangle_provider: Arc<CountingEntangleProvider>,
    genesis: Block,

    // Dropped last, once every reference to the db is gone
    _db_lifetime: DbLifetime,
}

impl TestChain {
    pub fn new(config: Config) -> Self {
        let (db_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10)).unwrap();
        let config = Arc::new(config);
        let storage = ChainStorage::new(db, &config);

        let genesis = config.genesis.build();
        let index_acceptor = IndexAcceptor::new(storage.clone());
        index_acceptor.init_genesis(&genesis).unwrap();

        let sanity_checker = Arc::new(RecordingSanityChecker::new());
        let cross_chain_checker = Arc::new(RecordingCrossChainChecker::new());
        let acceptor = Arc::new(RecordingAcceptor::new(Arc::new(index_acceptor)));
        let collateral_provider = Arc::new(CountingCollateralProvider::new(Some(sample_collateral_state())));
        let entangle_provider = Arc::new(CountingEntangleProvider::new(Some(sample_entangle_state())));

        let services = BlockChainServices {
            sanity_checker: sanity_checker.clone(),
            cross_chain_checker: cross_chain_checker.clone(),
            acceptor: acceptor.clone(),
            collateral_provider: collateral_provider.clone(),
            entangle_provider: entangle_provider.clone(),
            time_source: Arc::new(SystemTimeSource::new()),
        };
        let chain = BlockChain::new(config, storage, services);

        Self {
            chain,
            sanity_checker,
            cross_chain_checker,
            acceptor,
            collateral_provider,
            entangle_provider,
            genesis,
            _db_lifetime: db_lifetime,
        }
    }

    pub fn with_simnet() -> Self {
        Self::new(Config::new(SIMNET_PARAMS))
    }

    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    pub fn genesis_hash(&self) -> Hash {
        self.genesis.hash()
    }

    /// Processes `block` with no behavior flags
    pub fn process_block(&self, block: Block) -> BlockProcessResult<BlockProcessOutcome> {
        self.chain.process_block(block, BehaviorFlags::NONE)
    }

    /// Processes `blocks` in order, stopping at the first error
    pub fn process_blocks(&self, blocks: impl IntoIterator<Item = Block>) -> BlockProcessResult<Vec<BlockProcessOutcome>> {
        blocks.into_iter().map(|block| self.process_block(block)).collect()
    }
}
