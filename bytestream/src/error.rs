//! Error types for byte cursor and primitive codec operations.

use std::fmt;

use crate::Width;

/// Result type for bytestream operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while writing or reading primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    BufferUnderrun {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A varint ran past its width's maximum length, or its final group
    /// exceeds the width's representable range.
    BadVarint {
        /// Width class the varint was decoded as.
        width: Width,
    },

    /// A width class other than 1, 2, 4, 8 or 16 bytes was requested.
    UnsupportedWidth {
        /// The requested width in bytes.
        bytes: usize,
    },

    /// Unsigned value exceeds the range representable by the width class.
    UnsignedOutOfRange {
        /// The offending value.
        value: u128,
        /// Width class the value was written with.
        width: Width,
    },

    /// Signed value exceeds the range representable by the width class.
    SignedOutOfRange {
        /// The offending value.
        value: i128,
        /// Width class the value was written with.
        width: Width,
    },

    /// A length prefix does not fit in the 4-byte width class.
    LengthOverflow {
        /// The length that was attempted.
        length: u128,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferUnderrun {
                requested,
                available,
            } => {
                write!(
                    f,
                    "buffer underrun: attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::BadVarint { width } => {
                write!(f, "bad varint for {width} width class")
            }
            Self::UnsupportedWidth { bytes } => {
                write!(f, "unsupported width class of {bytes} bytes")
            }
            Self::UnsignedOutOfRange { value, width } => {
                write!(f, "unsigned value {value} cannot be represented in {width} width class")
            }
            Self::SignedOutOfRange { value, width } => {
                write!(f, "signed value {value} cannot be represented in {width} width class")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length {length} exceeds the u32 length prefix")
            }
        }
    }
}

impl std::error::Error for ByteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_buffer_underrun() {
        let err = ByteError::BufferUnderrun {
            requested: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bytes"), "should mention requested bytes");
        assert!(msg.contains("3 bytes"), "should mention available bytes");
        assert!(msg.contains("underrun"));
    }

    #[test]
    fn error_display_bad_varint() {
        let err = ByteError::BadVarint { width: Width::W4 };
        let msg = err.to_string();
        assert!(msg.contains("varint"));
        assert!(msg.contains("u32"), "should mention the width class");
    }

    #[test]
    fn error_display_unsupported_width() {
        let msg = ByteError::UnsupportedWidth { bytes: 3 }.to_string();
        assert!(msg.contains('3'));
    }

    #[test]
    fn error_display_value_out_of_range() {
        let err = ByteError::UnsignedOutOfRange {
            value: 256,
            width: Width::W1,
        };
        let msg = err.to_string();
        assert!(msg.contains("256"), "should mention the value");
        assert!(msg.contains("u8"), "should mention the width class");
    }

    #[test]
    fn error_equality() {
        let err1 = ByteError::BufferUnderrun {
            requested: 8,
            available: 3,
        };
        let err2 = ByteError::BufferUnderrun {
            requested: 8,
            available: 3,
        };
        let err3 = ByteError::BufferUnderrun {
            requested: 8,
            available: 4,
        };
        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ByteError>();
    }
}
