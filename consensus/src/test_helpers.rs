//! Block builders and recording collaborators for tests

use crate::{
    errors::{BlockProcessResult, RuleError},
    model::services::{
        acceptance::ChainAcceptor,
        cross_chain::{CollateralStateProvider, EntangleStateProvider},
        validation::{BlockSanityChecker, CrossChainChecker, SanityContext},
    },
};
use czz_addresses::{Address, Prefix, Version};
use czz_consensus_core::{
    BlockHeight,
    block::Block,
    config::params::REGTEST_PARAMS,
    cross::{BeaconAddressInfo, CollateralState, EntangleState, PledgeInfo},
    difficulty::hash_meets_target,
    flags::BehaviorFlags,
    header::Header,
    tx::{Transaction, TransactionOutput},
};
use czz_core::time::TimeSource;
use czz_hashes::Hash;
use czz_txscript::pay_to_address_script;
use itertools::Itertools;
use parking_lot::Mutex;
use std::{collections::HashSet, sync::Arc};

pub const TEST_BLOCK_BITS: u32 = REGTEST_PARAMS.pow_limit_bits;
pub const TEST_BLOCK_TIMESTAMP: u64 = 1_600_000_000_000;

/// The address test coinbases pay to
pub fn miner_address(prefix: Prefix) -> Address {
    Address::new(prefix, Version::PubKeyHash, &[0x11; 20])
}

/// Increments the nonce until the header hash meets its difficulty bits
pub fn mine(header: &mut Header) {
    header.finalize();
    while !hash_meets_target(header.hash, header.bits) {
        header.nonce += 1;
        header.finalize();
    }
}

/// A mined block on top of `parent` with a single coinbase paying [`miner_address`].
/// `tag` goes into the coinbase, so blocks with distinct tags have distinct hashes.
pub fn block_with_parent(parent: Hash, tag: u64) -> Block {
    let output = TransactionOutput::new(50, pay_to_address_script(&miner_address(Prefix::Simnet)));
    let coinbase = Transaction::new_coinbase(tag.to_le_bytes().to_vec(), vec![output]);
    let mut header = Header::new(1, parent, coinbase.id(), TEST_BLOCK_TIMESTAMP + tag, TEST_BLOCK_BITS, 0);
    mine(&mut header);
    Block::new(header, vec![coinbase])
}

/// `len` chained blocks, the first one on top of `parent`
pub fn chain_of_blocks(parent: Hash, len: usize, first_tag: u64) -> Vec<Block> {
    let mut parent = parent;
    (0..len as u64)
        .map(|i| {
            let block = block_with_parent(parent, first_tag + i);
            parent = block.hash();
            block
        })
        .collect_vec()
}

pub fn sample_collateral_state() -> CollateralState {
    CollateralState {
        pledge_infos: vec![
            PledgeInfo { id: 1, address: "pledge-a".to_string(), staking_amount: 100, coinbase_addresses: vec!["cb-a".to_string()] },
            PledgeInfo { id: 2, address: "pledge-b".to_string(), staking_amount: 200, coinbase_addresses: vec![] },
        ],
    }
}

/// A materialized state, distinguishable from anything derived from [`sample_collateral_state`]
pub fn sample_entangle_state() -> EntangleState {
    let info = BeaconAddressInfo { exchange_id: 77, address: "stored".to_string(), staking_amount: 7, coinbase_addresses: vec![] };
    EntangleState { en_infos: [(info.address.clone(), info)].into_iter().collect() }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub u64);

impl TimeSource for FixedTimeSource {
    fn adjusted_time(&self) -> u64 {
        self.0
    }
}

/// The arguments a sanity check was called with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityCall {
    pub hash: Hash,
    pub flags: BehaviorFlags,
    pub prev_header: Option<Hash>,
    pub entangle_state: Option<EntangleState>,
    pub coinbase_address: Option<Address>,
}

/// Accepts every block except the ones marked with [`RecordingSanityChecker::reject`],
/// which fail with [`RuleError::HighHash`]
#[derive(Default)]
pub struct RecordingSanityChecker {
    calls: Mutex<Vec<SanityCall>>,
    rejected: Mutex<HashSet<Hash>>,
}

impl RecordingSanityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&self, hash: Hash) {
        self.rejected.lock().insert(hash);
    }

    pub fn calls(&self) -> Vec<SanityCall> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<SanityCall> {
        self.calls.lock().last().cloned()
    }
}

impl BlockSanityChecker for RecordingSanityChecker {
    fn check_block_sanity(&self, block: &Block, ctx: &SanityContext<'_>) -> BlockProcessResult<()> {
        self.calls.lock().push(SanityCall {
            hash: block.hash(),
            flags: ctx.flags,
            prev_header: ctx.prev_header.map(|header| header.hash),
            entangle_state: ctx.entangle_state.cloned(),
            coinbase_address: ctx.coinbase_address.cloned(),
        });
        if self.rejected.lock().contains(&block.hash()) {
            return Err(RuleError::HighHash(block.hash()).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossChainCheck {
    Beacon,
    CrossTx,
}

/// Records cross-chain checks as `(check, block hash, parent height)`
#[derive(Default)]
pub struct RecordingCrossChainChecker {
    calls: Mutex<Vec<(CrossChainCheck, Hash, BlockHeight)>>,
    rejected: Mutex<HashSet<Hash>>,
}

impl RecordingCrossChainChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&self, hash: Hash) {
        self.rejected.lock().insert(hash);
    }

    pub fn calls(&self) -> Vec<(CrossChainCheck, Hash, BlockHeight)> {
        self.calls.lock().clone()
    }

    fn record(&self, check: CrossChainCheck, block: &Block, parent_height: BlockHeight) -> bool {
        self.calls.lock().push((check, block.hash(), parent_height));
        !self.rejected.lock().contains(&block.hash())
    }
}

impl CrossChainChecker for RecordingCrossChainChecker {
    fn check_beacon(&self, block: &Block, parent_height: BlockHeight) -> BlockProcessResult<()> {
        if !self.record(CrossChainCheck::Beacon, block, parent_height) {
            return Err(RuleError::InvalidBeacon(format!("block {} is marked invalid", block.hash())).into());
        }
        Ok(())
    }

    fn check_block_cross_tx(&self, block: &Block, parent_height: BlockHeight) -> BlockProcessResult<()> {
        if !self.record(CrossChainCheck::CrossTx, block, parent_height) {
            return Err(RuleError::InvalidCrossTransaction(format!("block {} is marked invalid", block.hash())).into());
        }
        Ok(())
    }
}

/// Delegates to an inner acceptor and records the blocks it accepted, in order. Blocks marked
/// with [`RecordingAcceptor::reject`] fail with [`RuleError::HighHash`] without reaching it.
pub struct RecordingAcceptor {
    inner: Arc<dyn ChainAcceptor>,
    accepted: Mutex<Vec<(Hash, BehaviorFlags)>>,
    rejected: Mutex<HashSet<Hash>>,
}

impl RecordingAcceptor {
    pub fn new(inner: Arc<dyn ChainAcceptor>) -> Self {
        Self { inner, accepted: Default::default(), rejected: Default::default() }
    }

    pub fn reject(&self, hash: Hash) {
        self.rejected.lock().insert(hash);
    }

    pub fn accepted(&self) -> Vec<Hash> {
        self.accepted.lock().iter().map(|(hash, _)| *hash).collect_vec()
    }

    pub fn accepted_flags(&self) -> Vec<BehaviorFlags> {
        self.accepted.lock().iter().map(|(_, flags)| *flags).collect_vec()
    }
}

impl ChainAcceptor for RecordingAcceptor {
    fn maybe_accept_block(&self, block: &Block, flags: BehaviorFlags) -> BlockProcessResult<bool> {
        if self.rejected.lock().contains(&block.hash()) {
            return Err(RuleError::HighHash(block.hash()).into());
        }
        let is_main_chain = self.inner.maybe_accept_block(block, flags)?;
        self.accepted.lock().push((block.hash(), flags));
        Ok(is_main_chain)
    }
}

/// Serves a fixed collateral snapshot and records the `(hash, height)` of each request
pub struct CountingCollateralProvider {
    state: Option<CollateralState>,
    calls: Mutex<Vec<(Hash, BlockHeight)>>,
}

impl CountingCollateralProvider {
    pub fn new(state: Option<CollateralState>) -> Self {
        Self { state, calls: Default::default() }
    }

    pub fn calls(&self) -> Vec<(Hash, BlockHeight)> {
        self.calls.lock().clone()
    }
}

impl CollateralStateProvider for CountingCollateralProvider {
    fn collateral_state(&self, hash: Hash, height: BlockHeight) -> BlockProcessResult<Option<CollateralState>> {
        self.calls.lock().push((hash, height));
        Ok(self.state.clone())
    }
}

/// Serves a fixed entangle state and records the `(hash, height)` of each request
pub struct CountingEntangleProvider {
    state: Option<EntangleState>,
    calls: Mutex<Vec<(Hash, BlockHeight)>>,
}

impl CountingEntangleProvider {
    pub fn new(state: Option<EntangleState>) -> Self {
        Self { state, calls: Default::default() }
    }

    pub fn calls(&self) -> Vec<(Hash, BlockHeight)> {
        self.calls.lock().clone()
    }
}

impl EntangleStateProvider for CountingEntangleProvider {
    fn entangle_state(&self, hash: Hash, height: BlockHeight) -> BlockProcessResult<Option<EntangleState>> {
        self.calls.lock().push((hash, height));
        Ok(self.state.clone())
    }
}
