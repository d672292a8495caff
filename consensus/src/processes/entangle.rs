use crate::{
    errors::{BlockProcessError, BlockProcessResult},
    model::services::cross_chain::{CollateralStateProvider, EntangleStateProvider},
};
use czz_consensus_core::{
    BlockHeight,
    config::params::Params,
    cross::{CrossChainEra, EntangleState},
};
use czz_hashes::Hash;
use std::sync::Arc;

/// Picks the entangle state a block is validated against, from the era of its parent
#[derive(Clone)]
pub struct EntangleStateSelector {
    params: Params,
    collateral_provider: Arc<dyn CollateralStateProvider>,
    entangle_provider: Arc<dyn EntangleStateProvider>,
}

impl EntangleStateSelector {
    pub fn new(
        params: Params,
        collateral_provider: Arc<dyn CollateralStateProvider>,
        entangle_provider: Arc<dyn EntangleStateProvider>,
    ) -> Self {
        Self { params, collateral_provider, entangle_provider }
    }

    pub fn select(&self, parent_hash: Hash, parent_height: BlockHeight) -> BlockProcessResult<Option<EntangleState>> {
        match self.params.cross_chain_era(parent_height) {
            CrossChainEra::PreBeacon => Ok(None),
            CrossChainEra::Beacon => {
                let collateral = self
                    .collateral_provider
                    .collateral_state(parent_hash, parent_height)?
                    .ok_or(BlockProcessError::MissingCollateralState(parent_hash, parent_height))?;
                Ok(Some(EntangleState::from_collateral(&collateral)))
            }
            CrossChainEra::Converted => self.entangle_provider.entangle_state(parent_hash, parent_height),
        }
    }
}
