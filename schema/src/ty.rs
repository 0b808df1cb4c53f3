//! Value type descriptors.

/// The shape of a value inside a container type.
///
/// Integer and float widths are stored as byte counts and checked when the
/// registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ValueType {
    /// The empty tuple; encodes to nothing.
    Unit,

    /// Boolean (1 byte).
    Bool,

    /// Unsigned integer of the given width class.
    #[cfg_attr(feature = "serde", serde(rename = "uint"))]
    UInt { bytes: u8 },

    /// Signed integer of the given width class (zigzag encoded).
    Int { bytes: u8 },

    /// IEEE-754 float, 4 or 8 bytes, little-endian.
    Float { bytes: u8 },

    /// Length-prefixed text.
    String,

    /// Length-prefixed byte array.
    Bytes,

    /// Present/absent tag followed by the value when present.
    Optional(Box<ValueType>),

    /// Homogeneous array; `len` set means fixed size with no length prefix.
    Array {
        items: Box<ValueType>,
        len: Option<usize>,
    },

    /// Key/value map with an entry-count prefix.
    Map {
        key: Box<ValueType>,
        value: Box<ValueType>,
    },

    /// Positional elements with no length prefix.
    Tuple(Vec<ValueType>),

    /// `start` then `end`, both of the bounds type.
    Range(Box<ValueType>),

    /// Reference to a container type registered by name.
    Named(String),
}

impl ValueType {
    #[must_use]
    pub const fn unit() -> Self {
        Self::Unit
    }

    #[must_use]
    pub const fn bool() -> Self {
        Self::Bool
    }

    /// Creates an unsigned integer type of `bytes` width.
    #[must_use]
    pub const fn uint(bytes: u8) -> Self {
        Self::UInt { bytes }
    }

    /// Creates a signed integer type of `bytes` width.
    #[must_use]
    pub const fn int(bytes: u8) -> Self {
        Self::Int { bytes }
    }

    /// Creates a float type of `bytes` width.
    #[must_use]
    pub const fn float(bytes: u8) -> Self {
        Self::Float { bytes }
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::String
    }

    #[must_use]
    pub const fn bytes() -> Self {
        Self::Bytes
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates a dynamically sized array type.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array {
            items: Box::new(items),
            len: None,
        }
    }

    /// Creates a fixed-size array type.
    #[must_use]
    pub fn fixed_array(items: Self, len: usize) -> Self {
        Self::Array {
            items: Box::new(items),
            len: Some(len),
        }
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn tuple(items: Vec<Self>) -> Self {
        Self::Tuple(items)
    }

    #[must_use]
    pub fn range(bounds: Self) -> Self {
        Self::Range(Box::new(bounds))
    }

    /// Creates a reference to a registered container type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Short human-readable name of the type's shape.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::UInt { .. } => "unsigned integer",
            Self::Int { .. } => "signed integer",
            Self::Float { .. } => "float",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Optional(_) => "optional",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Tuple(_) => "tuple",
            Self::Range(_) => "range",
            Self::Named(_) => "named type",
        }
    }

    /// Returns `true` if the type can be used as a map key.
    #[must_use]
    pub const fn is_valid_map_key(&self) -> bool {
        !matches!(self, Self::Unit | Self::Optional(_))
    }
}
