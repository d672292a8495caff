use crate::prelude::DbKey;
use czz_hashes::Hash;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("key {0} not found in store")]
    KeyNotFound(DbKey),

    #[error("hash {0} already exists in store")]
    HashAlreadyExists(Hash),

    #[error("data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("rocksdb error {0}")]
    DbError(#[from] rocksdb::Error),

    #[error("bincode error {0}")]
    DeserializationError(#[from] Box<bincode::ErrorKind>),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait StoreResultExtensions<T> {
    /// Maps a `KeyNotFound` error into `Ok(None)`, any other error is kept
    fn optional(self) -> StoreResult<Option<T>>;
}

impl<T> StoreResultExtensions<T> for StoreResult<T> {
    fn optional(self) -> StoreResult<Option<T>> {
        match self {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
