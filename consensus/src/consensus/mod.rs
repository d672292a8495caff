pub mod services;
pub mod storage;
pub mod test_chain;
