pub mod processor;

pub use processor::{BlockChain, BlockProcessOutcome};
