use crate::{Address, AddressError, PayloadVec, Prefix, Version};

const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const REV_CHARSET: [u8; 123] = [
    100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
    100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
    100, 100, 15, 100, 10, 17, 21, 20, 26, 30, 7, 5, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
    100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
    100, 100, 100, 29, 100, 24, 13, 25, 9, 8, 23, 100, 18, 22, 31, 27, 19, 100, 1, 0, 3, 16, 11, 28, 12, 14, 6, 4, 2,
];

/// Number of 5-bit groups carrying the 40-bit checksum
const CHECKSUM_LEN: usize = 8;

// Cash address checksum, a BCH code over GF(2^5)
fn polymod<'data, I>(values: I) -> u64
where
    I: Iterator<Item = &'data u8>,
{
    let mut c = 1u64;
    for d in values {
        let c0 = c >> 35;
        c = ((c & 0x07ffffffff) << 5) ^ (*d as u64);

        if c0 & 0x01 != 0 {
            c ^= 0x98f2bc8e61;
        }
        if c0 & 0x02 != 0 {
            c ^= 0x79b76d99e2;
        }
        if c0 & 0x04 != 0 {
            c ^= 0xf33e5fb3c4;
        }
        if c0 & 0x08 != 0 {
            c ^= 0xae2eabe2a8;
        }
        if c0 & 0x10 != 0 {
            c ^= 0x1e4f43e470;
        }
    }
    c ^ 1
}

fn checksum(payload: &[u8], prefix: &[u8]) -> u64 {
    polymod(prefix.iter().chain(&[0u8]).chain(payload).chain(&[0u8; CHECKSUM_LEN]))
}

fn fivebit_prefix(prefix: Prefix) -> Vec<u8> {
    prefix.as_str().as_bytes().iter().map(|c| c & 0x1fu8).collect()
}

// Regroups bits from `from`-bit words into `to`-bit words. With `pad` the trailing bits are
// right padded with zeros, otherwise they are dropped.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Vec<u8> {
    let mut acc = 0u32;
    let mut bits = 0u32;
    let max = (1u32 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        acc = (acc << from) | value as u32;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad && bits > 0 {
        out.push(((acc << (to - bits)) & max) as u8);
    }
    out
}

impl Address {
    pub(crate) fn encode_payload(&self) -> String {
        let mut versioned = Vec::with_capacity(self.payload.len() + 1);
        versioned.push(self.version as u8);
        versioned.extend_from_slice(&self.payload);
        let fivebit_payload = convert_bits(&versioned, 8, 5, true);

        let checksum = checksum(&fivebit_payload, &fivebit_prefix(self.prefix));
        let fivebit_checksum = convert_bits(&checksum.to_be_bytes()[3..], 8, 5, true);

        fivebit_payload.iter().chain(fivebit_checksum.iter()).map(|c| CHARSET[*c as usize] as char).collect()
    }

    pub(crate) fn decode_payload(prefix: Prefix, address: &str) -> Result<Self, AddressError> {
        let address_u5 = address
            .as_bytes()
            .iter()
            .map(|b| match REV_CHARSET.get(*b as usize) {
                None | Some(100) => Err(AddressError::DecodingError(*b as char)),
                Some(i) => Ok(*i),
            })
            .collect::<Result<Vec<u8>, _>>()?;

        // At least one group of version bits is required ahead of the checksum
        if address_u5.len() < CHECKSUM_LEN + 2 {
            return Err(AddressError::InvalidLength(address_u5.len()));
        }
        let (payload_u5, checksum_u5) = address_u5.split_at(address_u5.len() - CHECKSUM_LEN);

        let mut checksum_bytes = [0u8; 8];
        checksum_bytes[3..].copy_from_slice(&convert_bits(checksum_u5, 5, 8, false));
        if checksum(payload_u5, &fivebit_prefix(prefix)) != u64::from_be_bytes(checksum_bytes) {
            return Err(AddressError::BadChecksum);
        }

        let payload_u8 = convert_bits(payload_u5, 5, 8, false);
        let version = Version::try_from(payload_u8[0])?;
        let payload = &payload_u8[1..];
        if !prefix.is_test() && payload.len() != version.payload_len() {
            return Err(AddressError::InvalidLength(payload.len()));
        }
        Ok(Self { prefix, version, payload: PayloadVec::from_slice(payload) })
    }
}
