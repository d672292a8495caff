pub mod blocks;
pub mod chain_index;
pub mod cross_chain;

pub use czz_database::prelude::DB;
