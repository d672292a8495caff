mod hashers;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display, Formatter},
    str::{self, FromStr},
};

pub use hashers::{BlockHash, Hasher, HasherBase, TransactionHash};

pub const HASH_SIZE: usize = 32;

pub const ZERO_HASH: Hash = Hash([0u8; HASH_SIZE]);

/// A 32-byte double-SHA256 digest identifying blocks and transactions.
///
/// The textual form is the plain hex encoding of the bytes in storage order.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    #[inline(always)]
    pub const fn as_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// # Panics
    /// Panics if `bytes` length is not exactly `HASH_SIZE`.
    #[inline(always)]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(<[u8; HASH_SIZE]>::try_from(bytes).expect("Slice must have the length of Hash"))
    }

    /// Builds a hash whose first little-endian word is `word` and the rest is zeros.
    /// Mostly useful for tests and for precomputed identifiers.
    #[inline(always)]
    pub const fn from_u64_word(word: u64) -> Self {
        let le = word.to_le_bytes();
        let mut bytes = [0u8; HASH_SIZE];
        let mut i = 0;
        while i < 8 {
            bytes[i] = le[i];
            i += 1;
        }
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == ZERO_HASH
    }
}

impl AsRef<[u8; HASH_SIZE]> for Hash {
    #[inline(always)]
    fn as_ref(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Hash {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut hex = [0u8; HASH_SIZE * 2];
        faster_hex::hex_encode(&self.0, &mut hex).expect("The output is exactly twice the size of the input");
        f.write_str(str::from_utf8(&hex).expect("hex is always valid UTF-8"))
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Hash {
    type Err = faster_hex::Error;

    fn from_str(hash_str: &str) -> Result<Self, Self::Err> {
        if hash_str.len() != HASH_SIZE * 2 {
            return Err(faster_hex::Error::InvalidLength(hash_str.len()));
        }
        let mut bytes = [0u8; HASH_SIZE];
        faster_hex::hex_decode(hash_str.as_bytes(), &mut bytes)?;
        Ok(Hash(bytes))
    }
}

impl From<u64> for Hash {
    #[inline(always)]
    fn from(word: u64) -> Self {
        Self::from_u64_word(word)
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}
