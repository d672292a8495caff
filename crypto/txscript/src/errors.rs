use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum TxScriptError {
    #[error("unsupported public key type")]
    PubKeyFormat,

    #[error("invalid address payload: {0}")]
    InvalidAddress(#[from] czz_addresses::AddressError),
}
