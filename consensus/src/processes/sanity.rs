use crate::{
    errors::{BlockProcessResult, RuleError},
    model::services::validation::{BlockSanityChecker, SanityContext},
};
use czz_consensus_core::{
    block::Block,
    difficulty::{compact_to_target, hash_meets_target},
    flags::BehaviorFlags,
};

/// Context free block checks: proof of work, timestamp and coinbase layout
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockSanityValidator;

impl BlockSanityValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_proof_of_work(block: &Block, ctx: &SanityContext<'_>) -> BlockProcessResult<()> {
        let bits = block.header.bits;
        let (Some(target), Some(pow_limit)) = (compact_to_target(bits), compact_to_target(ctx.pow_limit_bits)) else {
            return Err(RuleError::BadDifficultyBits(bits).into());
        };
        if target > pow_limit {
            return Err(RuleError::BadDifficultyBits(bits).into());
        }
        if !ctx.flags.has_flag(BehaviorFlags::NO_POW_CHECK) && !hash_meets_target(block.hash(), bits) {
            return Err(RuleError::HighHash(block.hash()).into());
        }
        Ok(())
    }

    fn check_block_timestamp(block: &Block, ctx: &SanityContext<'_>) -> BlockProcessResult<()> {
        let max_timestamp = ctx.time_source.adjusted_time().saturating_add(ctx.params.max_future_block_time);
        if block.header.timestamp > max_timestamp {
            return Err(RuleError::TimeTooNew(block.header.timestamp, max_timestamp).into());
        }
        Ok(())
    }

    fn check_has_transactions(block: &Block) -> BlockProcessResult<()> {
        if block.transactions.is_empty() {
            return Err(RuleError::NoTransactions.into());
        }
        Ok(())
    }

    fn check_only_one_coinbase(block: &Block) -> BlockProcessResult<()> {
        if block.coinbase().is_none() {
            return Err(RuleError::MissingCoinbase.into());
        }

        if let Some(i) = block.transactions.iter().skip(1).position(|tx| tx.is_coinbase()) {
            return Err(RuleError::MultipleCoinbases(i + 1).into());
        }

        Ok(())
    }
}

impl BlockSanityChecker for BlockSanityValidator {
    fn check_block_sanity(&self, block: &Block, ctx: &SanityContext<'_>) -> BlockProcessResult<()> {
        Self::check_proof_of_work(block, ctx)?;
        Self::check_block_timestamp(block, ctx)?;
        Self::check_has_transactions(block)?;
        Self::check_only_one_coinbase(block)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::BlockProcessError,
        test_helpers::{FixedTimeSource, block_with_parent, mine},
    };
    use czz_consensus_core::{
        config::params::{MAINNET_PARAMS, SIMNET_PARAMS},
        tx::Transaction,
    };
    use czz_hashes::ZERO_HASH;

    fn check(block: &Block, flags: BehaviorFlags, now: u64) -> Result<(), RuleError> {
        let time_source = FixedTimeSource(now);
        let ctx = SanityContext {
            params: &SIMNET_PARAMS,
            prev_header: None,
            pow_limit_bits: SIMNET_PARAMS.pow_limit_bits,
            time_source: &time_source,
            flags,
            entangle_state: None,
            coinbase_address: None,
        };
        match BlockSanityValidator::new().check_block_sanity(block, &ctx) {
            Ok(()) => Ok(()),
            Err(BlockProcessError::Rule(err)) => Err(err),
            Err(err) => panic!("unexpected error {err}"),
        }
    }

    #[test]
    fn test_valid_block() {
        let block = block_with_parent(ZERO_HASH, 1);
        assert_eq!(check(&block, BehaviorFlags::NONE, block.header.timestamp), Ok(()));
    }

    #[test]
    fn test_proof_of_work_rules() {
        // Find a nonce whose hash misses the target
        let mut block = block_with_parent(ZERO_HASH, 1);
        while hash_meets_target(block.hash(), block.header.bits) {
            block.header.nonce += 1;
            block.header.finalize();
        }
        let now = block.header.timestamp;
        assert_eq!(check(&block, BehaviorFlags::NONE, now), Err(RuleError::HighHash(block.hash())));
        assert_eq!(check(&block, BehaviorFlags::NO_POW_CHECK, now), Ok(()));

        // Easier than the network limit
        let mut easy = block_with_parent(ZERO_HASH, 1);
        easy.header.bits = 0x2100ffff;
        mine(&mut easy.header);
        assert_eq!(check(&easy, BehaviorFlags::NO_POW_CHECK, now), Err(RuleError::BadDifficultyBits(0x2100ffff)));

        // Negative compact encoding
        let mut negative = block_with_parent(ZERO_HASH, 1);
        negative.header.bits = 0x1d80ffff;
        negative.header.finalize();
        assert_eq!(check(&negative, BehaviorFlags::NO_POW_CHECK, now), Err(RuleError::BadDifficultyBits(0x1d80ffff)));

        // Harder than the limit is fine once the proof of work check is skipped
        let mut hard = block_with_parent(ZERO_HASH, 1);
        hard.header.bits = MAINNET_PARAMS.pow_limit_bits;
        hard.header.finalize();
        assert_eq!(check(&hard, BehaviorFlags::NO_POW_CHECK, now), Ok(()));
    }

    #[test]
    fn test_timestamp_rule() {
        let block = block_with_parent(ZERO_HASH, 1);
        let max_future = SIMNET_PARAMS.max_future_block_time;
        let timestamp = block.header.timestamp;
        assert_eq!(check(&block, BehaviorFlags::NONE, timestamp - max_future), Ok(()));
        assert_eq!(
            check(&block, BehaviorFlags::NONE, timestamp - max_future - 1),
            Err(RuleError::TimeTooNew(timestamp, timestamp - 1))
        );
    }

    #[test]
    fn test_transaction_layout_rules() {
        let template = block_with_parent(ZERO_HASH, 1);
        let now = template.header.timestamp;
        let coinbase = template.transactions[0].clone();
        let regular = Transaction::new(1, vec![], vec![], 0);

        let empty = Block::new(template.header.clone(), vec![]);
        assert_eq!(check(&empty, BehaviorFlags::NO_POW_CHECK, now), Err(RuleError::NoTransactions));

        let no_coinbase = Block::new(template.header.clone(), vec![regular.clone()]);
        assert_eq!(check(&no_coinbase, BehaviorFlags::NO_POW_CHECK, now), Err(RuleError::MissingCoinbase));

        let two_coinbases = Block::new(template.header.clone(), vec![coinbase.clone(), regular, coinbase]);
        assert_eq!(check(&two_coinbases, BehaviorFlags::NO_POW_CHECK, now), Err(RuleError::MultipleCoinbases(2)));
    }
}
