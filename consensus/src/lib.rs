//! Block acceptance for the classzz chain.
//!
//! [`pipeline::BlockChain::process_block`] is the single entry point through which blocks enter the
//! local chain. Each call runs under the chain lock and ends with the block accepted on the main
//! chain or a side chain, buffered as an orphan until its parent arrives, or rejected.
//!
//! Collaborators which own rule checks, best chain selection and cross-chain accounting are
//! injected as traits through [`consensus::services::BlockChainServices`].

pub mod consensus;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod processes;
pub mod test_helpers;
