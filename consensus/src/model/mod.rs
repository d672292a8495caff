pub mod block_index;
pub mod services;
pub mod stores;
