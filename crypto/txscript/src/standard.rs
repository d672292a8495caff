use crate::{
    errors::TxScriptError,
    opcodes::codes::{OpCheckSig, OpData20, OpDup, OpEqual, OpEqualVerify, OpHash160},
    script_class::ScriptClass,
};
use czz_addresses::{Address, Prefix, Version};
use czz_consensus_core::tx::{ScriptPublicKey, ScriptVec};
use smallvec::SmallVec;
use std::iter::once;

/// Creates a new script to pay a transaction output to a 20-byte pubkey hash.
fn pay_to_pub_key_hash(pub_key_hash: &[u8]) -> ScriptVec {
    assert_eq!(pub_key_hash.len(), 20);
    SmallVec::from_iter(
        [OpDup, OpHash160, OpData20].iter().copied().chain(pub_key_hash.iter().copied()).chain([OpEqualVerify, OpCheckSig]),
    )
}

/// Creates a new script to pay a transaction output to a script hash.
/// It is expected that the input is a valid hash.
fn pay_to_script_hash(script_hash: &[u8]) -> ScriptVec {
    assert_eq!(script_hash.len(), 20);
    SmallVec::from_iter([OpHash160, OpData20].iter().copied().chain(script_hash.iter().copied()).chain(once(OpEqual)))
}

/// Creates a new script to pay a transaction output to the specified address.
pub fn pay_to_address_script(address: &Address) -> ScriptPublicKey {
    let script = match address.version {
        Version::PubKeyHash => pay_to_pub_key_hash(address.payload.as_slice()),
        Version::ScriptHash => pay_to_script_hash(address.payload.as_slice()),
    };
    ScriptPublicKey::new(script)
}

/// Returns the address encoded in a script public key.
///
/// Only 'standard' script classes carry an address. Anything else returns
/// the `TxScriptError::PubKeyFormat` error.
pub fn extract_script_pub_key_address(script_public_key: &ScriptPublicKey, prefix: Prefix) -> Result<Address, TxScriptError> {
    let script = script_public_key.script();
    match ScriptClass::from_script(script_public_key) {
        ScriptClass::NonStandard => Err(TxScriptError::PubKeyFormat),
        ScriptClass::PubKeyHash => Ok(Address::try_new(prefix, Version::PubKeyHash, &script[3..23])?),
        ScriptClass::ScriptHash => Ok(Address::try_new(prefix, Version::ScriptHash, &script[2..22])?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::codes::{OpReturn, OpTrue};

    #[test]
    fn test_extract_script_pub_key_address() {
        struct Test {
            name: &'static str,
            script_pub_key: ScriptPublicKey,
            prefix: Prefix,
            expected_address: Result<Address, TxScriptError>,
        }

        let mut p2pkh = vec![0u8; 25];
        faster_hex::hex_decode(b"76a91476a04053bda0a88bda5177b86a15c3b29f55987388ac", &mut p2pkh).unwrap();
        let mut p2sh = vec![0u8; 23];
        faster_hex::hex_decode(b"a91476a04053bda0a88bda5177b86a15c3b29f55987387", &mut p2sh).unwrap();
        let hash160 = &p2pkh[3..23];

        let tests = vec![
            Test {
                name: "Mainnet PubKeyHash script",
                script_pub_key: ScriptPublicKey::from_vec(p2pkh.clone()),
                prefix: Prefix::Mainnet,
                expected_address: Ok(Address::new(Prefix::Mainnet, Version::PubKeyHash, hash160)),
            },
            Test {
                name: "Testnet ScriptHash script",
                script_pub_key: ScriptPublicKey::from_vec(p2sh),
                prefix: Prefix::Testnet,
                expected_address: Ok(Address::new(Prefix::Testnet, Version::ScriptHash, hash160)),
            },
            Test {
                name: "Data carrier script",
                script_pub_key: ScriptPublicKey::from_vec(vec![OpReturn, 0x01, 0xff]),
                prefix: Prefix::Mainnet,
                expected_address: Err(TxScriptError::PubKeyFormat),
            },
            Test {
                name: "Anyone can spend",
                script_pub_key: ScriptPublicKey::from_vec(vec![OpTrue]),
                prefix: Prefix::Mainnet,
                expected_address: Err(TxScriptError::PubKeyFormat),
            },
        ];

        for test in tests {
            let extracted = extract_script_pub_key_address(&test.script_pub_key, test.prefix);
            assert_eq!(extracted, test.expected_address, "extract address test failed for '{}'", test.name);
            if let Ok(ref address) = extracted {
                let encoded = pay_to_address_script(address);
                assert_eq!(encoded, test.script_pub_key, "encode public key script test failed for '{}'", test.name);
            }
        }
    }
}
