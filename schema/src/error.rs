//! Schema validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two container types share a name.
    DuplicateType { name: String },

    /// Duplicate field name within a struct or struct variant.
    DuplicateField { owner: String, field: String },

    /// Duplicate variant name within an enum.
    DuplicateVariant { owner: String, variant: String },

    /// An enum declares no variants.
    EmptyEnum { name: String },

    /// A named type reference does not resolve to a registered container.
    UnresolvedType { name: String, referenced_by: String },

    /// Integer width is not one of 1, 2, 4, 8 or 16 bytes.
    InvalidWidth { owner: String, bytes: u8 },

    /// Float width is not 4 or 8 bytes.
    InvalidFloatWidth { owner: String, bytes: u8 },

    /// Map key type cannot be used as a key.
    InvalidMapKey { owner: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateType { name } => write!(f, "duplicate type `{name}`"),
            Self::DuplicateField { owner, field } => {
                write!(f, "duplicate field `{field}` in `{owner}`")
            }
            Self::DuplicateVariant { owner, variant } => {
                write!(f, "duplicate variant `{variant}` in `{owner}`")
            }
            Self::EmptyEnum { name } => write!(f, "enum `{name}` has no variants"),
            Self::UnresolvedType {
                name,
                referenced_by,
            } => {
                write!(f, "type `{name}` referenced by `{referenced_by}` is not registered")
            }
            Self::InvalidWidth { owner, bytes } => {
                write!(f, "invalid integer width of {bytes} bytes in `{owner}`")
            }
            Self::InvalidFloatWidth { owner, bytes } => {
                write!(f, "invalid float width of {bytes} bytes in `{owner}`")
            }
            Self::InvalidMapKey { owner } => {
                write!(f, "map key in `{owner}` must not be unit or optional")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
