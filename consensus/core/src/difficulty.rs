//! Compact difficulty bits, as carried by block headers

use czz_hashes::{HASH_SIZE, Hash};

/// A 256-bit target in big-endian byte order
pub type Target = [u8; HASH_SIZE];

/// Expands compact `bits` into a big-endian target. Returns `None` for negative
/// encodings and for encodings overflowing 256 bits.
pub fn compact_to_target(bits: u32) -> Option<Target> {
    let exponent = (bits >> 24) as usize;
    let mantissa = bits & 0x007f_ffff;
    if bits & 0x0080_0000 != 0 && mantissa != 0 {
        return None;
    }

    let mut target = [0u8; HASH_SIZE];
    if exponent <= 3 {
        let value = mantissa >> (8 * (3 - exponent));
        target[HASH_SIZE - 3..].copy_from_slice(&value.to_be_bytes()[1..]);
        return Some(target);
    }

    let mantissa_bytes = mantissa.to_be_bytes();
    for (i, byte) in mantissa_bytes[1..].iter().enumerate() {
        let pos = HASH_SIZE as isize - exponent as isize + i as isize;
        if pos < 0 {
            if *byte != 0 {
                return None;
            }
            continue;
        }
        target[pos as usize] = *byte;
    }
    Some(target)
}

/// Block hashes are read as little-endian 256-bit numbers
pub fn hash_as_target_order(hash: Hash) -> Target {
    let mut bytes = hash.as_bytes();
    bytes.reverse();
    bytes
}

/// Returns whether `hash`, read as a number, does not exceed the target encoded by `bits`
pub fn hash_meets_target(hash: Hash, bits: u32) -> bool {
    match compact_to_target(bits) {
        Some(target) => hash_as_target_order(hash) <= target,
        None => false,
    }
}
