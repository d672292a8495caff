pub mod errors;
pub mod opcodes;
pub mod script_class;
pub mod standard;

pub use errors::TxScriptError;
pub use script_class::ScriptClass;
pub use standard::{extract_script_pub_key_address, pay_to_address_script};
