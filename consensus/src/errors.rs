use czz_consensus_core::BlockHeight;
use czz_database::prelude::StoreError;
use czz_hashes::Hash;
use thiserror::Error;

pub use czz_consensus_core::errors::block::RuleError;

/// Failure of a block processing attempt. [`BlockProcessError::Rule`] rejects the block,
/// the other variants are infrastructure failures which say nothing about its validity.
#[derive(Error, Debug)]
pub enum BlockProcessError {
    #[error("{0}")]
    Rule(#[from] RuleError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("no collateral state is available for block {0} at height {1}")]
    MissingCollateralState(Hash, BlockHeight),
}

impl BlockProcessError {
    pub fn rule_error(&self) -> Option<&RuleError> {
        match self {
            BlockProcessError::Rule(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_rule_error(&self) -> bool {
        self.rule_error().is_some()
    }
}

pub type BlockProcessResult<T> = std::result::Result<T, BlockProcessError>;
