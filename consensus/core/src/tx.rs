use czz_hashes::{Hash, HasherBase, TransactionHash, ZERO_HASH};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{Debug, Formatter};

/// Represents the ID of a Classzz transaction
pub type TransactionId = Hash;

/// Size of the underlying script vector of a script.
pub const SCRIPT_VECTOR_SIZE: usize = 36;

/// Used as the underlying type for script public key data, optimized for the common p2pkh script size (25).
pub type ScriptVec = SmallVec<[u8; SCRIPT_VECTOR_SIZE]>;

/// Alias the `smallvec!` macro to ease maintenance
pub use smallvec::smallvec as scriptvec;

/// Index of the null outpoint spent by coinbase transactions
pub const COINBASE_OUTPOINT_INDEX: u32 = u32::MAX;

/// Represents a Classzz ScriptPublicKey
#[derive(Default, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct ScriptPublicKey {
    script: ScriptVec, // Kept private to preserve read-only semantics
}

impl ScriptPublicKey {
    pub fn new(script: ScriptVec) -> Self {
        Self { script }
    }

    pub fn from_vec(script: Vec<u8>) -> Self {
        Self { script: ScriptVec::from_vec(script) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }
}

impl Debug for ScriptPublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPublicKey").field("script", &faster_hex::hex_string(&self.script)).finish()
    }
}

/// Represents a Classzz transaction outpoint
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionOutpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }

    /// The outpoint "spent" by a coinbase input
    pub fn null() -> Self {
        Self { transaction_id: ZERO_HASH, index: COINBASE_OUTPOINT_INDEX }
    }

    pub fn is_null(&self) -> bool {
        self.index == COINBASE_OUTPOINT_INDEX && self.transaction_id == ZERO_HASH
    }
}

/// Represents a Classzz transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    pub signature_script: Vec<u8>,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint, signature_script: Vec<u8>, sequence: u32) -> Self {
        Self { previous_outpoint, signature_script, sequence }
    }
}

/// Represents a Classzz transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_public_key: ScriptPublicKey,
}

impl TransactionOutput {
    pub fn new(value: u64, script_public_key: ScriptPublicKey) -> Self {
        Self { value, script_public_key }
    }
}

/// Represents a Classzz transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u16,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,

    // A field that is used to cache the transaction ID.
    // Always use the corresponding self.id() instead of accessing this field directly
    id: TransactionId,
}

impl Transaction {
    pub fn new(version: u16, inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>, lock_time: u32) -> Self {
        let mut tx = Self { version, inputs, outputs, lock_time, id: Default::default() };
        tx.finalize();
        tx
    }

    /// Builds a coinbase transaction spending the null outpoint, with `extra_data`
    /// as its signature script
    pub fn new_coinbase(extra_data: Vec<u8>, outputs: Vec<TransactionOutput>) -> Self {
        Self::new(1, vec![TransactionInput::new(TransactionOutpoint::null(), extra_data, u32::MAX)], outputs, 0)
    }

    /// Determines whether or not a transaction is a coinbase transaction. A coinbase
    /// transaction has exactly one input, which spends the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_outpoint.is_null()
    }

    /// Recompute and finalize the tx id based on updated tx fields
    pub fn finalize(&mut self) {
        self.id = hash(self);
    }

    /// Returns the transaction ID
    pub fn id(&self) -> TransactionId {
        self.id
    }
}

/// Double SHA-256 of the consensus fields of `tx`
pub fn hash(tx: &Transaction) -> Hash {
    let mut hasher = TransactionHash::new();
    hasher.update(tx.version.to_le_bytes()).update((tx.inputs.len() as u64).to_le_bytes());
    for input in tx.inputs.iter() {
        hasher
            .update(input.previous_outpoint.transaction_id)
            .update(input.previous_outpoint.index.to_le_bytes())
            .update((input.signature_script.len() as u64).to_le_bytes())
            .update(&input.signature_script)
            .update(input.sequence.to_le_bytes());
    }
    hasher.update((tx.outputs.len() as u64).to_le_bytes());
    for output in tx.outputs.iter() {
        let script = output.script_public_key.script();
        hasher.update(output.value.to_le_bytes()).update((script.len() as u64).to_le_bytes()).update(script);
    }
    hasher.update(tx.lock_time.to_le_bytes());
    hasher.finalize()
}
