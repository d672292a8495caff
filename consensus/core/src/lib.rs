pub mod block;
pub mod config;
pub mod cross;
pub mod difficulty;
pub mod errors;
pub mod flags;
pub mod header;
pub mod tx;

/// Height of a block on the chain it belongs to, genesis being 0
pub type BlockHeight = u64;
