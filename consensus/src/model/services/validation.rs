use crate::errors::BlockProcessResult;
use czz_addresses::Address;
use czz_consensus_core::{
    BlockHeight, block::Block, config::params::Params, cross::EntangleState, flags::BehaviorFlags, header::Header,
};
use czz_core::time::TimeSource;

/// Everything a context-free sanity check may consult besides the block itself
pub struct SanityContext<'a> {
    pub params: &'a Params,
    /// Header of the declared parent, when it is known
    pub prev_header: Option<&'a Header>,
    pub pow_limit_bits: u32,
    pub time_source: &'a dyn TimeSource,
    pub flags: BehaviorFlags,
    pub entangle_state: Option<&'a EntangleState>,
    /// Address paid by the first coinbase output, when it decodes as a standard script
    pub coinbase_address: Option<&'a Address>,
}

/// Checks which depend on the block alone and not on its position in the chain
pub trait BlockSanityChecker: Send + Sync {
    fn check_block_sanity(&self, block: &Block, ctx: &SanityContext<'_>) -> BlockProcessResult<()>;
}

/// Validation of the cross-chain data carried by blocks. `parent_height` is the height
/// of the block's declared parent.
pub trait CrossChainChecker: Send + Sync {
    /// Applies to blocks strictly inside the beacon window
    fn check_beacon(&self, block: &Block, parent_height: BlockHeight) -> BlockProcessResult<()>;

    /// Applies to blocks from the conversion height on
    fn check_block_cross_tx(&self, block: &Block, parent_height: BlockHeight) -> BlockProcessResult<()>;
}
