extern crate self as czz_core;

pub mod log;
pub mod time;
