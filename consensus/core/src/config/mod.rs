pub mod genesis;
pub mod params;

use std::{num::NonZeroUsize, ops::Deref};

use params::Params;

/// Default bound on the number of buffered orphan blocks
pub const DEFAULT_MAX_ORPHAN_BLOCKS: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Default time in milliseconds an orphan block stays buffered
pub const DEFAULT_ORPHAN_EXPIRATION: u64 = 60 * 60 * 1000;

/// Default number of blocks held by the block store cache
pub const DEFAULT_BLOCK_CACHE_SIZE: usize = 2000;

/// Various consensus configurations all bundled up under a single struct. Use `Config::new` for directly building from
/// a `Params` instance. For anything more complex it is recommended to use `ConfigBuilder`. NOTE: this struct can be
/// implicitly de-refed into `Params`
#[derive(Clone, Debug)]
pub struct Config {
    /// Consensus params
    pub params: Params,

    //
    // Additional consensus configuration arguments which are not consensus sensitive
    //
    /// Maximum number of orphan blocks kept in memory. Nonzero, so an orphan outcome always
    /// leaves its block buffered.
    pub max_orphan_blocks: NonZeroUsize,

    /// Time in milliseconds after which a buffered orphan block may be evicted
    pub orphan_expiration: u64,

    /// Number of blocks cached by the block store
    pub block_cache_size: usize,
}

impl Config {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            max_orphan_blocks: DEFAULT_MAX_ORPHAN_BLOCKS,
            orphan_expiration: DEFAULT_ORPHAN_EXPIRATION,
            block_cache_size: DEFAULT_BLOCK_CACHE_SIZE,
        }
    }

    pub fn to_builder(&self) -> ConfigBuilder {
        ConfigBuilder { config: self.clone() }
    }
}

impl AsRef<Params> for Config {
    fn as_ref(&self) -> &Params {
        &self.params
    }
}

impl Deref for Config {
    type Target = Params;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new(params: Params) -> Self {
        Self { config: Config::new(params) }
    }

    pub fn edit_consensus_params<F>(mut self, edit_func: F) -> Self
    where
        F: Fn(&mut Params),
    {
        edit_func(&mut self.config.params);
        self
    }

    pub fn apply_args<F>(mut self, edit_func: F) -> Self
    where
        F: Fn(&mut Config),
    {
        edit_func(&mut self.config);
        self
    }

    pub fn set_max_orphan_blocks(mut self, max_orphan_blocks: NonZeroUsize) -> Self {
        self.config.max_orphan_blocks = max_orphan_blocks;
        self
    }

    pub fn set_orphan_expiration(mut self, orphan_expiration: u64) -> Self {
        self.config.orphan_expiration = orphan_expiration;
        self
    }

    pub fn set_block_cache_size(mut self, block_cache_size: usize) -> Self {
        self.config.block_cache_size = block_cache_size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use params::{REGTEST_PARAMS, SIMNET_PARAMS};

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new(SIMNET_PARAMS)
            .edit_consensus_params(|p| {
                p.beacon_height = 4;
                p.conver_height = 8;
            })
            .set_max_orphan_blocks(NonZeroUsize::new(3).unwrap())
            .build();
        assert_eq!(config.beacon_height, 4);
        assert_eq!(config.conver_height, 8);
        assert_eq!(config.max_orphan_blocks.get(), 3);
        assert_eq!(config.orphan_expiration, DEFAULT_ORPHAN_EXPIRATION);

        let rebuilt = config.to_builder().set_orphan_expiration(10).apply_args(|c| c.params = REGTEST_PARAMS).build();
        assert_eq!(rebuilt.orphan_expiration, 10);
        assert_eq!(rebuilt.max_orphan_blocks.get(), 3);
        assert_eq!(rebuilt.net_name, "regtest");
    }
}
