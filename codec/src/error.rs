//! Error types for codec operations.

use std::fmt;

use bytestream::{ByteError, Width};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while checking, encoding or decoding a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Byte-level error (underrun, bad varint, unsupported width, ...).
    Bytes(ByteError),

    /// The type name is not in the registry.
    UnknownType { name: String },

    /// A decoded enum ordinal has no matching variant.
    UnknownVariant {
        type_name: String,
        ordinal: u32,
        variants: usize,
    },

    /// The value does not match the shape of its type.
    ShapeMismatch { path: String, reason: ShapeReason },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Input had bytes left over after the value was decoded.
    TrailingBytes { remaining: usize },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Depth,
    ContainerLen,
    InputBytes,
}

/// Details for shape mismatch errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeReason {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    MissingField {
        field: String,
    },
    UnexpectedField {
        field: String,
    },
    ArityMismatch {
        expected: usize,
        found: usize,
    },
    UnknownVariantName {
        name: String,
    },
    UnsignedOutOfRange {
        width: Width,
        value: u128,
    },
    SignedOutOfRange {
        width: Width,
        value: i128,
    },
    FixedLengthMismatch {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(e) => write!(f, "byte stream error: {e}"),
            Self::UnknownType { name } => write!(f, "unknown type '{name}'"),
            Self::UnknownVariant {
                type_name,
                ordinal,
                variants,
            } => {
                write!(
                    f,
                    "unknown variant ordinal {ordinal} for '{type_name}' ({variants} variants)"
                )
            }
            Self::ShapeMismatch { path, reason } => {
                write!(f, "shape mismatch at {path}: {reason}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after value")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Depth => "nesting depth",
            Self::ContainerLen => "container length",
            Self::InputBytes => "input bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ShapeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} but got {found}")
            }
            Self::MissingField { field } => write!(f, "missing field '{field}'"),
            Self::UnexpectedField { field } => write!(f, "unexpected field '{field}'"),
            Self::ArityMismatch { expected, found } => {
                write!(f, "expected {expected} elements, got {found}")
            }
            Self::UnknownVariantName { name } => write!(f, "unknown variant '{name}'"),
            Self::UnsignedOutOfRange { width, value } => {
                write!(f, "unsigned value {value} does not fit in {width}")
            }
            Self::SignedOutOfRange { width, value } => {
                write!(f, "signed value {value} does not fit in {width}")
            }
            Self::FixedLengthMismatch { expected, found } => {
                write!(f, "fixed array needs {expected} elements, got {found}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ByteError> for CodecError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}
