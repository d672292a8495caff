use czz_hashes::{BlockHash, Hash, HasherBase, ZERO_HASH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub hash: Hash, // cached hash
    pub version: u16,
    pub prev_block: Hash,
    pub merkle_root: Hash,
    /// Timestamp in milliseconds
    pub timestamp: u64,
    pub bits: u32,
    pub nonce: u64,
}

impl Header {
    pub fn new(version: u16, prev_block: Hash, merkle_root: Hash, timestamp: u64, bits: u32, nonce: u64) -> Self {
        let mut header = Self { hash: ZERO_HASH, version, prev_block, merkle_root, timestamp, bits, nonce };
        header.finalize();
        header
    }

    /// Recompute and finalize the header hash based on updated header fields
    pub fn finalize(&mut self) {
        self.hash = hash(self);
    }

    /// Temp function for injecting the hash externally
    pub fn from_precomputed_hash(hash: Hash, prev_block: Hash) -> Self {
        Self { hash, version: 0, prev_block, merkle_root: ZERO_HASH, timestamp: 0, bits: 0, nonce: 0 }
    }
}

/// Double SHA-256 over the header fields, excluding the cached hash
pub fn hash(header: &Header) -> Hash {
    let mut hasher = BlockHash::new();
    hasher
        .update(header.version.to_le_bytes())
        .update(header.prev_block)
        .update(header.merkle_root)
        .update(header.timestamp.to_le_bytes())
        .update(header.bits.to_le_bytes())
        .update(header.nonce.to_le_bytes());
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_hash() {
        let mut header = Header::new(1, 10.into(), ZERO_HASH, 1_600_000_000_000, 0x207fffff, 5);
        let initial = header.hash;
        assert_eq!(initial, hash(&header));

        header.nonce += 1;
        header.finalize();
        assert_ne!(header.hash, initial);

        let precomputed = Header::from_precomputed_hash(3.into(), 2.into());
        assert_eq!(precomputed.hash, 3.into());
        assert_eq!(precomputed.prev_block, 2.into());
    }
}
