//! The subset of opcodes appearing in standard output scripts

#[allow(non_upper_case_globals)]
pub mod codes {
    pub const OpData20: u8 = 0x14;
    pub const OpTrue: u8 = 0x51;
    pub const OpReturn: u8 = 0x6a;
    pub const OpDup: u8 = 0x76;
    pub const OpEqual: u8 = 0x87;
    pub const OpEqualVerify: u8 = 0x88;
    pub const OpHash160: u8 = 0xa9;
    pub const OpCheckSig: u8 = 0xac;
}
