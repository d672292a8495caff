pub mod acceptance;
pub mod entangle;
pub mod existence;
pub mod orphans;
pub mod sanity;
