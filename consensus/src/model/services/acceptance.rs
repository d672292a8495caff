use crate::errors::BlockProcessResult;
use czz_consensus_core::{block::Block, flags::BehaviorFlags};

/// Connects a block whose parent is known to the chain. Owns best chain selection.
pub trait ChainAcceptor: Send + Sync {
    /// Returns whether the block extended the main chain
    fn maybe_accept_block(&self, block: &Block, flags: BehaviorFlags) -> BlockProcessResult<bool>;
}
