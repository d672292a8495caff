use czz_consensus_core::{BlockHeight, header::Header};
use czz_hashes::Hash;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

/// An entry of the block index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockNode {
    pub header: Arc<Header>,
    pub height: BlockHeight,
}

/// In-memory index of the blocks accepted into the chain, main chain and side chains alike.
///
/// Entries are only added under the chain lock, reads may happen from any thread.
#[derive(Default)]
pub struct BlockIndex {
    nodes: RwLock<HashMap<Hash, BlockNode>>,
}

impl BlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn have_block(&self, hash: Hash) -> bool {
        self.nodes.read().contains_key(&hash)
    }

    pub fn lookup(&self, hash: Hash) -> Option<BlockNode> {
        self.nodes.read().get(&hash).cloned()
    }

    pub fn insert(&self, header: Arc<Header>, height: BlockHeight) {
        self.nodes.write().insert(header.hash, BlockNode { header, height });
    }
}
