use crate::opcodes::codes::{OpCheckSig, OpData20, OpDup, OpEqual, OpEqualVerify, OpHash160};
use czz_addresses::Version;
use czz_consensus_core::tx::ScriptPublicKey;
use std::fmt::{Display, Formatter};

/// Standard classes of script public keys
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[repr(u8)]
pub enum ScriptClass {
    /// None of the recognized forms
    NonStandard = 0,
    /// Pay to pubkey hash
    PubKeyHash,
    /// Pay to script hash
    ScriptHash,
}

const NON_STANDARD: &str = "nonstandard";
const PUB_KEY_HASH: &str = "pubkeyhash";
const SCRIPT_HASH: &str = "scripthash";

impl ScriptClass {
    pub fn from_script(script_public_key: &ScriptPublicKey) -> Self {
        let script = script_public_key.script();
        if Self::is_pay_to_pubkey_hash(script) {
            ScriptClass::PubKeyHash
        } else if Self::is_pay_to_script_hash(script) {
            ScriptClass::ScriptHash
        } else {
            ScriptClass::NonStandard
        }
    }

    // OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    #[inline(always)]
    pub fn is_pay_to_pubkey_hash(script: &[u8]) -> bool {
        script.len() == 25
            && script[0] == OpDup
            && script[1] == OpHash160
            && script[2] == OpData20
            && script[23] == OpEqualVerify
            && script[24] == OpCheckSig
    }

    // OP_HASH160 <20 bytes> OP_EQUAL
    #[inline(always)]
    pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
        script.len() == 23 && script[0] == OpHash160 && script[1] == OpData20 && script[22] == OpEqual
    }

    fn as_str(&self) -> &'static str {
        match self {
            ScriptClass::NonStandard => NON_STANDARD,
            ScriptClass::PubKeyHash => PUB_KEY_HASH,
            ScriptClass::ScriptHash => SCRIPT_HASH,
        }
    }
}

impl Display for ScriptClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Version> for ScriptClass {
    fn from(value: Version) -> Self {
        match value {
            Version::PubKeyHash => ScriptClass::PubKeyHash,
            Version::ScriptHash => ScriptClass::ScriptHash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_class_from_script() {
        struct Test {
            name: &'static str,
            script: Vec<u8>,
            class: ScriptClass,
        }

        let p2pkh = [&[OpDup, OpHash160, OpData20][..], &[0x11; 20], &[OpEqualVerify, OpCheckSig]].concat();
        let p2sh = [&[OpHash160, OpData20][..], &[0x22; 20], &[OpEqual]].concat();

        let tests = vec![
            Test { name: "pay to pubkey hash", script: p2pkh.clone(), class: ScriptClass::PubKeyHash },
            Test { name: "pay to script hash", script: p2sh.clone(), class: ScriptClass::ScriptHash },
            Test { name: "truncated p2pkh", script: p2pkh[..24].to_vec(), class: ScriptClass::NonStandard },
            Test { name: "p2sh with trailing byte", script: [p2sh.as_slice(), &[0]].concat(), class: ScriptClass::NonStandard },
            Test {
                name: "p2pkh with wrong push size",
                script: [&[OpDup, OpHash160, 0x13][..], &[0x11; 20], &[OpEqualVerify, OpCheckSig]].concat(),
                class: ScriptClass::NonStandard,
            },
            Test { name: "empty script", script: vec![], class: ScriptClass::NonStandard },
        ];

        for test in tests {
            let script_public_key = ScriptPublicKey::from_vec(test.script);
            assert_eq!(test.class, ScriptClass::from_script(&script_public_key), "{} wrong script class", test.name);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ScriptClass::PubKeyHash.to_string(), "pubkeyhash");
        assert_eq!(ScriptClass::from(Version::ScriptHash).to_string(), "scripthash");
    }
}
