use crate::model::services::{
    acceptance::ChainAcceptor,
    cross_chain::{CollateralStateProvider, EntangleStateProvider},
    validation::{BlockSanityChecker, CrossChainChecker},
};
use czz_core::time::TimeSource;
use std::sync::Arc;

/// The collaborators block processing delegates to
#[derive(Clone)]
pub struct BlockChainServices {
    pub sanity_checker: Arc<dyn BlockSanityChecker>,
    pub cross_chain_checker: Arc<dyn CrossChainChecker>,
    pub acceptor: Arc<dyn ChainAcceptor>,
    pub collateral_provider: Arc<dyn CollateralStateProvider>,
    pub entangle_provider: Arc<dyn EntangleStateProvider>,
    pub time_source: Arc<dyn TimeSource>,
}
