pub use super::genesis::{GenesisBlock, MAINNET_GENESIS, REGTEST_GENESIS, SIMNET_GENESIS, TESTNET_GENESIS};
use crate::{BlockHeight, cross::CrossChainEra};
use czz_addresses::Prefix;

/// Consensus parameters. Contains settings and configurations which are consensus-sensitive.
/// Changing one of these on a network node would exclude and prevent it from reaching consensus
/// with the other unmodified nodes.
#[derive(Clone, Debug)]
pub struct Params {
    pub net_name: &'static str,
    pub prefix: Prefix,
    pub genesis: GenesisBlock,

    /// Height from which blocks carry cross-chain beacon data
    pub beacon_height: BlockHeight,
    /// Height from which the cross-chain state reached its stable representation
    pub conver_height: BlockHeight,

    /// Highest allowed proof of work target, in compact form
    pub pow_limit_bits: u32,
    /// Target time per block in milliseconds
    pub target_time_per_block: u64,
    /// Maximum distance in milliseconds a block timestamp may lead the adjusted time
    pub max_future_block_time: u64,
}

impl Params {
    /// The cross-chain era governing validation of a block whose parent sits at `parent_height`
    pub fn cross_chain_era(&self, parent_height: BlockHeight) -> CrossChainEra {
        if parent_height < self.beacon_height {
            CrossChainEra::PreBeacon
        } else if parent_height < self.conver_height {
            CrossChainEra::Beacon
        } else {
            CrossChainEra::Converted
        }
    }

    /// Blocks strictly between the beacon and conversion heights pass the beacon check
    pub fn is_beacon_window(&self, block_height: BlockHeight) -> bool {
        self.beacon_height < block_height && block_height < self.conver_height
    }

    /// Blocks at or past the conversion height pass the cross-chain transaction check
    pub fn is_converted(&self, block_height: BlockHeight) -> bool {
        self.conver_height <= block_height
    }
}

const SECOND: u64 = 1000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

pub const MAINNET_PARAMS: Params = Params {
    net_name: "mainnet",
    prefix: Prefix::Mainnet,
    genesis: MAINNET_GENESIS,
    beacon_height: 1_200_000,
    conver_height: 2_000_000,
    pow_limit_bits: 0x1d00ffff,
    target_time_per_block: 10 * MINUTE,
    max_future_block_time: 2 * HOUR,
};

pub const TESTNET_PARAMS: Params = Params {
    net_name: "testnet",
    prefix: Prefix::Testnet,
    genesis: TESTNET_GENESIS,
    beacon_height: 3_000,
    conver_height: 6_000,
    pow_limit_bits: 0x1d00ffff,
    target_time_per_block: 10 * MINUTE,
    max_future_block_time: 2 * HOUR,
};

pub const REGTEST_PARAMS: Params = Params {
    net_name: "regtest",
    prefix: Prefix::Regtest,
    genesis: REGTEST_GENESIS,
    beacon_height: 100,
    conver_height: 200,
    pow_limit_bits: 0x207fffff,
    target_time_per_block: 10 * MINUTE,
    max_future_block_time: 2 * HOUR,
};

pub const SIMNET_PARAMS: Params = Params {
    net_name: "simnet",
    prefix: Prefix::Simnet,
    genesis: SIMNET_GENESIS,
    beacon_height: 10,
    conver_height: 20,
    pow_limit_bits: 0x207fffff,
    target_time_per_block: SECOND,
    max_future_block_time: 2 * HOUR,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_windows() {
        let params = SIMNET_PARAMS;
        assert_eq!(params.cross_chain_era(0), CrossChainEra::PreBeacon);
        assert_eq!(params.cross_chain_era(9), CrossChainEra::PreBeacon);
        assert_eq!(params.cross_chain_era(10), CrossChainEra::Beacon);
        assert_eq!(params.cross_chain_era(19), CrossChainEra::Beacon);
        assert_eq!(params.cross_chain_era(20), CrossChainEra::Converted);

        // The beacon window excludes both of its bounds
        assert!(!params.is_beacon_window(10));
        assert!(params.is_beacon_window(11));
        assert!(params.is_beacon_window(19));
        assert!(!params.is_beacon_window(20));
        assert!(!params.is_converted(19));
        assert!(params.is_converted(20));
    }

    #[test]
    fn test_network_params() {
        for params in [MAINNET_PARAMS, TESTNET_PARAMS, REGTEST_PARAMS, SIMNET_PARAMS] {
            assert!(params.beacon_height < params.conver_height, "{}", params.net_name);
            assert!(crate::difficulty::compact_to_target(params.pow_limit_bits).is_some(), "{}", params.net_name);
        }
    }
}
