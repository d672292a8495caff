use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

mod bech32;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum AddressError {
    #[error("Invalid prefix {0}")]
    InvalidPrefix(String),

    #[error("Prefix is missing")]
    MissingPrefix,

    #[error("Invalid version {0}")]
    InvalidVersion(u8),

    #[error("Invalid character {0}")]
    DecodingError(char),

    #[error("Invalid payload length {0}")]
    InvalidLength(usize),

    #[error("Checksum is invalid")]
    BadChecksum,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub enum Prefix {
    #[serde(rename = "czz")]
    Mainnet,
    #[serde(rename = "czztest")]
    Testnet,
    #[serde(rename = "czzreg")]
    Regtest,
    #[serde(rename = "czzsim")]
    Simnet,
    #[cfg(test)]
    A,
    #[cfg(test)]
    B,
    #[cfg(test)]
    BitcoinCash,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Mainnet => "czz",
            Prefix::Testnet => "czztest",
            Prefix::Regtest => "czzreg",
            Prefix::Simnet => "czzsim",
            #[cfg(test)]
            Prefix::A => "a",
            #[cfg(test)]
            Prefix::B => "b",
            #[cfg(test)]
            Prefix::BitcoinCash => "bitcoincash",
        }
    }

    #[inline(always)]
    fn is_test(&self) -> bool {
        #[cfg(not(test))]
        return false;
        #[cfg(test)]
        matches!(self, Prefix::A | Prefix::B)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Prefix {
    type Error = AddressError;

    fn try_from(prefix: &str) -> Result<Self, Self::Error> {
        match prefix {
            "czz" => Ok(Prefix::Mainnet),
            "czztest" => Ok(Prefix::Testnet),
            "czzreg" => Ok(Prefix::Regtest),
            "czzsim" => Ok(Prefix::Simnet),
            #[cfg(test)]
            "a" => Ok(Prefix::A),
            #[cfg(test)]
            "b" => Ok(Prefix::B),
            #[cfg(test)]
            "bitcoincash" => Ok(Prefix::BitcoinCash),
            _ => Err(AddressError::InvalidPrefix(prefix.to_string())),
        }
    }
}

///
///  Classzz `Address` version (`PubKeyHash`, `ScriptHash`)
///
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Version {
    /// Pay-to-pubkey-hash addresses always have the version byte set to 0
    PubKeyHash = 0,
    /// Pay-to-script-hash addresses always have the version byte set to 8
    ScriptHash = 8,
}

impl Version {
    /// Both versions commit to a RIPEMD160(SHA256(..)) digest
    pub fn payload_len(&self) -> usize {
        HASH160_SIZE
    }
}

impl TryFrom<u8> for Version {
    type Error = AddressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Version::PubKeyHash),
            8 => Ok(Version::ScriptHash),
            _ => Err(AddressError::InvalidVersion(value)),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::PubKeyHash => f.write_str("PubKeyHash"),
            Version::ScriptHash => f.write_str("ScriptHash"),
        }
    }
}

pub const HASH160_SIZE: usize = 20;

/// Used as the underlying type for address payload
pub type PayloadVec = SmallVec<[u8; HASH160_SIZE]>;

/// Classzz `Address` struct that serializes to and from an address format string: `czz:qpm2...wvy2`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct Address {
    pub prefix: Prefix,
    pub version: Version,
    pub payload: PayloadVec,
}

impl Address {
    pub fn new(prefix: Prefix, version: Version, payload: &[u8]) -> Self {
        if !prefix.is_test() {
            assert_eq!(payload.len(), version.payload_len());
        }
        Self { prefix, payload: PayloadVec::from_slice(payload), version }
    }

    /// Builds an address after checking the payload length, for payloads of external origin
    pub fn try_new(prefix: Prefix, version: Version, payload: &[u8]) -> Result<Self, AddressError> {
        if payload.len() != version.payload_len() {
            return Err(AddressError::InvalidLength(payload.len()));
        }
        Ok(Self::new(prefix, version, payload))
    }

    pub fn is_script_hash(&self) -> bool {
        self.version == Version::ScriptHash
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.prefix, self.encode_payload())
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        (&address).into()
    }
}

impl From<&Address> for String {
    fn from(address: &Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.split_once(':') {
            Some((prefix, payload)) => Self::decode_payload(prefix.try_into()?, payload),
            None => Err(AddressError::MissingPrefix),
        }
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.try_into()
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressVisitor)
    }
}

struct AddressVisitor;

impl serde::de::Visitor<'_> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "valid address string")
    }

    fn visit_str<E>(self, str: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Address::try_from(str).map_err(|_| serde::de::Error::invalid_value(serde::de::Unexpected::Str(str), &self))
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn cases() -> Vec<(Address, &'static str)> {
        // cspell:disable
        vec![
            (Address::new(Prefix::A, Version::PubKeyHash, b""), "a:qqeq69uvrh"),
            (Address::new(Prefix::A, Version::ScriptHash, b""), "a:pq99546ray"),
            (Address::new(Prefix::B, Version::ScriptHash, b" "), "b:pqsqzsjd64fv"),
            (Address::new(Prefix::B, Version::ScriptHash, b"-"), "b:pqksmhczf8ud"),
            (Address::new(Prefix::B, Version::ScriptHash, b"0"), "b:pqcq53eqrk0e"),
            (Address::new(Prefix::B, Version::ScriptHash, b"1"), "b:pqcshg75y0vf"),
            (Address::new(Prefix::B, Version::ScriptHash, b"-1"), "b:pqknzl4e9y0zy"),
            (Address::new(Prefix::B, Version::ScriptHash, b"11"), "b:pqcnzt888ytdg"),
            (Address::new(Prefix::B, Version::ScriptHash, b"abc"), "b:ppskycc8txxxn2w"),
            (Address::new(Prefix::B, Version::ScriptHash, b"1234598760"), "b:pqcnyve5x5unsdekxqeusxeyu2"),
            (Address::new(Prefix::B, Version::ScriptHash, b"abcdefghijklmnopqrstuvwxyz"), "b:ppskycmyv4nxw6rfdf4kcmtwdac8zunnw36hvamc09aqtpppz8lk"),
            (Address::new(Prefix::BitcoinCash, Version::PubKeyHash, b"\x76\xa0\x40\x53\xbd\xa0\xa8\x8b\xda\x51\x77\xb8\x6a\x15\xc3\xb2\x9f\x55\x98\x73"), "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a"),
            (Address::new(Prefix::BitcoinCash, Version::ScriptHash, b"\x76\xa0\x40\x53\xbd\xa0\xa8\x8b\xda\x51\x77\xb8\x6a\x15\xc3\xb2\x9f\x55\x98\x73"), "bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq"),
        ]
        // cspell:enable
    }

    #[test]
    fn check_into_string() {
        for (address, expected_address_str) in cases() {
            let address_str: String = address.into();
            assert_eq!(address_str, expected_address_str);
        }
    }

    #[test]
    fn check_from_string() {
        for (expected_address, address_str) in cases() {
            let address: Address = address_str.to_string().try_into().expect("Test failed");
            assert_eq!(address, expected_address);
        }
    }

    #[test]
    fn test_network_prefixes() {
        for prefix in [Prefix::Mainnet, Prefix::Testnet, Prefix::Regtest, Prefix::Simnet] {
            let address = Address::new(prefix, Version::PubKeyHash, &[0x5a; HASH160_SIZE]);
            let address_str = address.to_string();
            assert!(address_str.starts_with(&format!("{}:q", prefix)));
            assert_eq!(address_str.parse::<Address>().unwrap(), address);
            // The checksum commits to the prefix
            let foreign = address_str.replacen(prefix.as_str(), if prefix == Prefix::Mainnet { "czztest" } else { "czz" }, 1);
            assert_eq!(foreign.parse::<Address>(), Err(AddressError::BadChecksum));
        }
    }

    #[test]
    fn test_errors() {
        // cspell:disable
        let address: Result<Address, AddressError> = "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6b".try_into();
        assert_eq!(Err(AddressError::DecodingError('b')), address);

        let address: Result<Address, AddressError> = "bitcoincash1:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a".try_into();
        assert_eq!(Err(AddressError::InvalidPrefix("bitcoincash1".into())), address);

        let address: Result<Address, AddressError> = "bitcoincashqpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a".try_into();
        assert_eq!(Err(AddressError::MissingPrefix), address);

        let address: Result<Address, AddressError> = "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6q".try_into();
        assert_eq!(Err(AddressError::BadChecksum), address);

        let address: Result<Address, AddressError> = "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx".try_into();
        assert_eq!(Err(AddressError::BadChecksum), address);

        let address: Result<Address, AddressError> = "czz:qqqq".try_into();
        assert_eq!(Err(AddressError::InvalidLength(4)), address);

        let address: Result<Address, AddressError> = "czz:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6é".try_into();
        assert!(matches!(address, Err(AddressError::DecodingError(_))));
        // cspell:enable
    }

    #[test]
    fn test_payload_length() {
        assert_eq!(Address::try_new(Prefix::Mainnet, Version::ScriptHash, &[1u8; 32]), Err(AddressError::InvalidLength(32)));
        let address = Address::try_new(Prefix::Mainnet, Version::ScriptHash, &[1u8; HASH160_SIZE]).unwrap();
        assert!(address.is_script_hash());
    }

    #[test]
    fn test_serde() {
        let address = Address::new(Prefix::Testnet, Version::PubKeyHash, &[7u8; HASH160_SIZE]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), address);
        assert!(serde_json::from_str::<Address>("\"czz:qqqq\"").is_err());
    }
}
