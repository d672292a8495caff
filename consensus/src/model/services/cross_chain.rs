use crate::errors::BlockProcessResult;
use czz_consensus_core::{
    BlockHeight,
    cross::{CollateralState, EntangleState},
};
use czz_hashes::Hash;

/// Source of the pledge snapshots from which the transitional entangle state is derived
pub trait CollateralStateProvider: Send + Sync {
    fn collateral_state(&self, hash: Hash, height: BlockHeight) -> BlockProcessResult<Option<CollateralState>>;
}

/// Source of the materialized entangle state of a block
pub trait EntangleStateProvider: Send + Sync {
    fn entangle_state(&self, hash: Hash, height: BlockHeight) -> BlockProcessResult<Option<EntangleState>>;
}
