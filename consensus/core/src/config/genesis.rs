use crate::{
    block::Block,
    header::Header,
    tx::{ScriptPublicKey, Transaction, TransactionOutput},
};
use czz_hashes::{Hash, ZERO_HASH};

/// Fields of a network's genesis block. The block itself is assembled on demand
/// since its hash is not computable in a const context.
#[derive(Clone, Copy, Debug)]
pub struct GenesisBlock {
    pub version: u16,
    pub timestamp: u64,
    pub bits: u32,
    pub nonce: u64,
    pub coinbase_payload: &'static [u8],
}

impl GenesisBlock {
    pub fn build(&self) -> Block {
        // The genesis reward is unspendable
        let coinbase = Transaction::new_coinbase(self.coinbase_payload.to_vec(), vec![TransactionOutput::new(0, ScriptPublicKey::from_vec(vec![0x6a]))]);
        // A single transaction is its own merkle root
        let header = Header::new(self.version, ZERO_HASH, coinbase.id(), self.timestamp, self.bits, self.nonce);
        Block::new(header, vec![coinbase])
    }

    pub fn hash(&self) -> Hash {
        self.build().hash()
    }
}

pub const MAINNET_GENESIS: GenesisBlock = GenesisBlock {
    version: 1,
    timestamp: 1_571_760_000_000,
    bits: 0x1d00ffff,
    nonce: 0x2083_2aa3,
    coinbase_payload: b"classzz mainnet genesis",
};

pub const TESTNET_GENESIS: GenesisBlock = GenesisBlock {
    version: 1,
    timestamp: 1_571_760_000_000,
    bits: 0x1d00ffff,
    nonce: 0x18ae_a3b3,
    coinbase_payload: b"classzz testnet genesis",
};

pub const REGTEST_GENESIS: GenesisBlock =
    GenesisBlock { version: 1, timestamp: 1_571_760_000_000, bits: 0x207fffff, nonce: 2, coinbase_payload: b"classzz regtest genesis" };

pub const SIMNET_GENESIS: GenesisBlock =
    GenesisBlock { version: 1, timestamp: 1_571_760_000_000, bits: 0x207fffff, nonce: 2, coinbase_payload: b"classzz simnet genesis" };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_blocks() {
        let genesis = MAINNET_GENESIS.build();
        assert_eq!(genesis.prev_block(), ZERO_HASH);
        assert!(genesis.coinbase().is_some());
        assert_eq!(genesis.header.merkle_root, genesis.transactions[0].id());
        assert_eq!(MAINNET_GENESIS.hash(), genesis.hash());
        assert_ne!(MAINNET_GENESIS.hash(), TESTNET_GENESIS.hash());
        assert_ne!(REGTEST_GENESIS.hash(), SIMNET_GENESIS.hash());
    }
}
