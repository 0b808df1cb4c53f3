//! Integer width classes.

use std::fmt;

use crate::error::{ByteError, ByteResult};

const BITS_PER_BYTE: u32 = 8;
const BITS_PER_VARINT_BYTE: u32 = 7;

/// The maximum representable range of an integer before varint compression.
///
/// A width class does not fix the on-wire size: values wider than one byte
/// are written as varints of at most [`varint_max_bytes`](Self::varint_max_bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    W1,
    W2,
    W4,
    W8,
    W16,
}

impl Width {
    /// All width classes, narrowest first.
    pub const ALL: [Self; 5] = [Self::W1, Self::W2, Self::W4, Self::W8, Self::W16];

    /// Width class used for lengths, variant ordinals and option tags.
    pub const LENGTH: Self = Self::W4;

    /// Resolves a byte count into a width class.
    pub const fn from_bytes(bytes: usize) -> ByteResult<Self> {
        match bytes {
            1 => Ok(Self::W1),
            2 => Ok(Self::W2),
            4 => Ok(Self::W4),
            8 => Ok(Self::W8),
            16 => Ok(Self::W16),
            _ => Err(ByteError::UnsupportedWidth { bytes }),
        }
    }

    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W1 => 1,
            Self::W2 => 2,
            Self::W4 => 4,
            Self::W8 => 8,
            Self::W16 => 16,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bytes() as u32 * BITS_PER_BYTE
    }

    /// Maximum number of bytes a varint of this width may occupy,
    /// `ceil(8 * bytes / 7)`.
    #[must_use]
    pub const fn varint_max_bytes(self) -> usize {
        self.bits().div_ceil(BITS_PER_VARINT_BYTE) as usize
    }

    /// Largest value the final varint byte may carry.
    #[must_use]
    pub const fn max_of_last_varint_byte(self) -> u8 {
        let rem = self.bits() % BITS_PER_VARINT_BYTE;
        if rem == 0 {
            0x7F
        } else {
            (1u8 << rem) - 1
        }
    }

    /// Largest unsigned value representable, `2^bits - 1`.
    #[must_use]
    pub const fn max_unsigned(self) -> u128 {
        u128::MAX >> (128 - self.bits())
    }

    /// Smallest signed value representable, `-2^(bits-1)`.
    #[must_use]
    pub const fn min_signed(self) -> i128 {
        i128::MIN >> (128 - self.bits())
    }

    /// Largest signed value representable, `2^(bits-1) - 1`.
    #[must_use]
    pub const fn max_signed(self) -> i128 {
        i128::MAX >> (128 - self.bits())
    }

    /// Returns `true` if `value` fits the unsigned range.
    #[must_use]
    pub const fn fits_unsigned(self, value: u128) -> bool {
        value <= self.max_unsigned()
    }

    /// Returns `true` if `value` fits the signed range.
    #[must_use]
    pub const fn fits_signed(self, value: i128) -> bool {
        value >= self.min_signed() && value <= self.max_signed()
    }
}

impl TryFrom<usize> for Width {
    type Error = ByteError;

    fn try_from(bytes: usize) -> ByteResult<Self> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_accepts_known_widths() {
        for width in Width::ALL {
            assert_eq!(Width::from_bytes(width.bytes()).unwrap(), width);
        }
    }

    #[test]
    fn from_bytes_rejects_unknown_widths() {
        for bytes in [0, 3, 5, 12, 32] {
            assert_eq!(
                Width::from_bytes(bytes),
                Err(ByteError::UnsupportedWidth { bytes })
            );
        }
    }

    #[test]
    fn varint_max_bytes_matches_ceil() {
        assert_eq!(Width::W1.varint_max_bytes(), 2);
        assert_eq!(Width::W2.varint_max_bytes(), 3);
        assert_eq!(Width::W4.varint_max_bytes(), 5);
        assert_eq!(Width::W8.varint_max_bytes(), 10);
        assert_eq!(Width::W16.varint_max_bytes(), 19);
    }

    #[test]
    fn max_of_last_varint_byte() {
        assert_eq!(Width::W1.max_of_last_varint_byte(), 0b1);
        assert_eq!(Width::W2.max_of_last_varint_byte(), 0b11);
        assert_eq!(Width::W4.max_of_last_varint_byte(), 0b1111);
        assert_eq!(Width::W8.max_of_last_varint_byte(), 0b1);
        assert_eq!(Width::W16.max_of_last_varint_byte(), 0b11);
    }

    #[test]
    fn ranges() {
        assert_eq!(Width::W1.max_unsigned(), 255);
        assert_eq!(Width::W2.max_unsigned(), u128::from(u16::MAX));
        assert_eq!(Width::W16.max_unsigned(), u128::MAX);
        assert_eq!(Width::W1.min_signed(), -128);
        assert_eq!(Width::W1.max_signed(), 127);
        assert_eq!(Width::W8.min_signed(), i128::from(i64::MIN));
        assert_eq!(Width::W16.max_signed(), i128::MAX);
        assert!(Width::W2.fits_signed(-32768));
        assert!(!Width::W2.fits_signed(32768));
        assert!(!Width::W4.fits_unsigned(1 << 32));
    }

    #[test]
    fn display_names_the_unsigned_type() {
        assert_eq!(Width::W4.to_string(), "u32");
        assert_eq!(Width::W16.to_string(), "u128");
    }
}
