use std::sync::Arc;

use crate::{
    header::Header,
    tx::{ScriptPublicKey, Transaction},
};
use czz_hashes::Hash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Arc<Vec<Transaction>>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Self { header, transactions: Arc::new(transactions) }
    }

    pub fn hash(&self) -> Hash {
        self.header.hash
    }

    /// The hash of the block this block declares as its parent
    pub fn prev_block(&self) -> Hash {
        self.header.prev_block
    }

    /// Returns the first transaction if it is a coinbase
    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first().filter(|tx| tx.is_coinbase())
    }

    /// Script of the first output of the first transaction, where the coinbase pays the miner
    pub fn coinbase_script(&self) -> Option<&ScriptPublicKey> {
        self.transactions.first().and_then(|tx| tx.outputs.first()).map(|output| &output.script_public_key)
    }
}
