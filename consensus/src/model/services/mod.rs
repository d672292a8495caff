pub mod acceptance;
pub mod cross_chain;
pub mod validation;
