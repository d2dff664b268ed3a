//! Bit-flag packing, most significant bit first.

use crate::error::{StreamError, StreamResult};

/// Maximum number of flags that fit in one packed word.
pub const MAX_FLAG_BITS: usize = 32;

/// Expands the low `bits` bits of `value` into booleans, most significant
/// bit first.
///
/// `unpack_flags(0xAA, 8)` yields `[true, false, true, false, ...]`.
pub fn unpack_flags(value: u32, bits: usize) -> StreamResult<Vec<bool>> {
    if bits > MAX_FLAG_BITS {
        return Err(StreamError::InvalidBitCount {
            bits,
            max_bits: MAX_FLAG_BITS,
        });
    }
    Ok((0..bits).rev().map(|i| (value >> i) & 1 == 1).collect())
}

/// Packs booleans into an unsigned integer, first element as the most
/// significant bit.
pub fn pack_flags(flags: &[bool]) -> StreamResult<u32> {
    if flags.len() > MAX_FLAG_BITS {
        return Err(StreamError::InvalidBitCount {
            bits: flags.len(),
            max_bits: MAX_FLAG_BITS,
        });
    }
    Ok(flags
        .iter()
        .fold(0u32, |acc, &flag| (acc << 1) | u32::from(flag)))
}
