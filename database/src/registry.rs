/// We use `u8::MAX` as a reserved value. Through the [`DatabaseStorePrefixes`]
/// enum we make sure it is not used as a prefix
pub const SEPARATOR: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DatabaseStorePrefixes {
    // ---- Blocks ----
    Blocks = 1,

    // ---- Main chain ----
    ChainHashByIndex = 20,
    ChainIndexByHash = 21,
    ChainTip = 22,

    // ---- Cross chain ----
    EntangleStates = 40,
    CollateralStates = 41,

    // ---- Separator ----
    /// Reserved as a separator
    Separator = SEPARATOR,
}

impl From<DatabaseStorePrefixes> for Vec<u8> {
    fn from(value: DatabaseStorePrefixes) -> Self {
        [value as u8].to_vec()
    }
}

impl From<DatabaseStorePrefixes> for u8 {
    fn from(value: DatabaseStorePrefixes) -> Self {
        value as u8
    }
}

impl AsRef<[u8]> for DatabaseStorePrefixes {
    fn as_ref(&self) -> &[u8] {
        // SAFETY: enum has repr(u8)
        std::slice::from_ref(unsafe { &*(self as *const Self as *const u8) })
    }
}
