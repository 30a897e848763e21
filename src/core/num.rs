//! Script Numbers
//!
//! Integers on the stack are little-endian sign-magnitude byte strings,
//! minimally encoded, with zero as the empty string. Arithmetic operands
//! are limited to four bytes; results may grow to five.

use thiserror::Error;

/// Largest magnitude an arithmetic operand may carry (4-byte sign-magnitude).
pub const MAX_SCRIPT_NUM: i64 = 0x7fff_ffff;

/// Maximum operand width in bytes.
pub const MAX_NUM_SIZE: usize = 4;

/// Maximum size of a single pushed element.
pub const MAX_ELEMENT_SIZE: usize = 520;

/// A value cannot be represented in the program encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Integer outside the 4-byte script number range.
    #[error("number {0} is outside the script number range ±{MAX_SCRIPT_NUM}")]
    NumberOutOfRange(i64),
    /// Pushed data exceeds the element size limit.
    #[error("push of {len} bytes exceeds the {max}-byte element limit")]
    PushTooLarge {
        /// Size of the rejected push.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Check that `n` fits a 4-byte script number.
pub fn check_range(n: i64) -> Result<i64, EncodingError> {
    if n.unsigned_abs() > MAX_SCRIPT_NUM as u64 {
        return Err(EncodingError::NumberOutOfRange(n));
    }
    Ok(n)
}

/// Encode an integer minimally.
pub fn encode_num(num: i64) -> Vec<u8> {
    if num == 0 {
        return Vec::new();
    }

    let negative = num < 0;
    let mut abs_val = num.unsigned_abs();
    let mut result = Vec::with_capacity(9);

    while abs_val > 0 {
        result.push((abs_val & 0xff) as u8);
        abs_val >>= 8;
    }

    // Sign bit goes in the top byte, or in an extra byte if that one is taken.
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }

    result
}

/// Decode a stack element as an arithmetic operand.
///
/// Returns `None` when the element is wider than `max_size` bytes.
pub fn decode_num(data: &[u8], max_size: usize) -> Option<i64> {
    if data.is_empty() {
        return Some(0);
    }
    if data.len() > max_size {
        return None;
    }

    let mut result = 0i64;
    for (i, &byte) in data.iter().enumerate() {
        result |= (byte as i64) << (8 * i);
    }

    let top = data.len() - 1;
    if data[top] & 0x80 != 0 {
        result &= !(0x80i64 << (8 * top));
        result = -result;
    }

    Some(result)
}

/// Canonical truth test for stack elements.
///
/// False is empty, all zero bytes, or negative zero.
pub fn cast_to_bool(data: &[u8]) -> bool {
    for (i, &byte) in data.iter().enumerate() {
        if byte != 0 {
            if i == data.len() - 1 && byte == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}
