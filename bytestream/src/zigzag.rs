//! Zigzag mapping between signed and unsigned integers.
//!
//! Small magnitudes in either direction map to small unsigned values, so the
//! varint that follows stays short: `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`.

use crate::Width;

/// Maps a signed value onto the unsigned range of `width`.
///
/// `value` must fit the signed range of `width`; bits above the width are
/// discarded otherwise.
#[must_use]
pub const fn zigzag_encode(value: i128, width: Width) -> u128 {
    let sign = value >> (width.bits() - 1);
    ((value << 1) ^ sign) as u128 & width.max_unsigned()
}

/// Inverse of [`zigzag_encode`].
#[must_use]
pub const fn zigzag_decode(encoded: u128) -> i128 {
    ((encoded >> 1) as i128) ^ -((encoded & 1) as i128)
}
