use bitflags::bitflags;

bitflags! {
    /// A bitmask defining tweaks to the normal behavior when performing
    /// chain processing and consensus rules checks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BehaviorFlags: u32 {
        /// Several checks can be avoided for the block since it is already known to
        /// fit into the chain due to proving it links into the chain up to a known checkpoint
        const FAST_ADD = 1 << 0;
        /// Skip the proof of work check
        const NO_POW_CHECK = 1 << 1;
        /// Validate according to the magnetic anomaly hardfork rule set
        const MAGNETIC_ANOMALY = 1 << 2;
        /// Skip the block existence checks
        const NO_DUP_BLOCK_CHECK = 1 << 3;
    }
}

impl BehaviorFlags {
    /// Convenience value to specifically indicate no flags
    pub const NONE: Self = Self::empty();

    /// Returns whether all bits of `flag` are set
    #[inline]
    pub fn has_flag(self, flag: BehaviorFlags) -> bool {
        self.contains(flag)
    }
}
