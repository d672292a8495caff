use czz_hashes::Hash;
use thiserror::Error;

fn orphan_tag(orphan: &bool) -> &'static str {
    if *orphan { " (orphan)" } else { "" }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("already have block{} {hash}", orphan_tag(.orphan))]
    DuplicateBlock { hash: Hash, orphan: bool },

    #[error("block does not contain any transactions")]
    NoTransactions,

    #[error("first transaction in block is not a coinbase")]
    MissingCoinbase,

    #[error("block contains a second coinbase at index {0}")]
    MultipleCoinbases(usize),

    #[error("block difficulty bits {0:#010x} are invalid or above the proof of work limit")]
    BadDifficultyBits(u32),

    #[error("block hash {0} is higher than the target of its difficulty bits")]
    HighHash(Hash),

    #[error("block timestamp of {0} is too far in the future, the maximum allowed is {1}")]
    TimeTooNew(u64, u64),

    #[error("beacon check failed: {0}")]
    InvalidBeacon(String),

    #[error("cross chain transaction check failed: {0}")]
    InvalidCrossTransaction(String),

    #[error("previous block {0} is unknown")]
    MissingParent(Hash),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_block_message() {
        let hash: Hash = 1.into();
        let chain = RuleError::DuplicateBlock { hash, orphan: false };
        let orphan = RuleError::DuplicateBlock { hash, orphan: true };
        assert_eq!(chain.to_string(), format!("already have block {hash}"));
        assert_eq!(orphan.to_string(), format!("already have block (orphan) {hash}"));
    }
}
