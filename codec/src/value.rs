//! Dynamic values encoded and decoded against a registry type.

/// A value whose shape is checked against a [`schema::ValueType`] at runtime.
///
/// Ranges are represented as a `Struct` with `start` and `end` fields.
/// Enum payloads follow the variant's shape: a single-field tuple variant
/// carries the field directly, a multi-field one a `Tuple`, a struct variant
/// a `Struct`, and a unit variant nothing. Single-field tuple structs also
/// carry their field directly.
///
/// Equality compares `Struct` fields by name, so field order is ignored the
/// same way it is when encoding.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    UInt(u128),
    Int(i128),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Option(Option<Box<Value>>),
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
    /// Entries in wire order.
    Map(Vec<(Value, Value)>),
    /// Named fields; order does not matter when encoding.
    Struct(Vec<(String, Value)>),
    Variant {
        name: String,
        value: Option<Box<Value>>,
    },
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Option(a), Self::Option(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => {
                a.len() == b.len() && fields_within(a, b) && fields_within(b, a)
            }
            (
                Self::Variant { name: a, value: x },
                Self::Variant { name: b, value: y },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

fn fields_within(fields: &[(String, Value)], other: &[(String, Value)]) -> bool {
    fields.iter().all(|(name, value)| {
        other
            .iter()
            .any(|(other_name, other_value)| name == other_name && value == other_value)
    })
}

impl Value {
    /// Creates a present optional value.
    #[must_use]
    pub fn some(value: impl Into<Self>) -> Self {
        Self::Option(Some(Box::new(value.into())))
    }

    /// Creates an absent optional value.
    #[must_use]
    pub const fn none() -> Self {
        Self::Option(None)
    }

    /// Creates a struct value from `(name, value)` pairs.
    #[must_use]
    pub fn structure<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Creates a unit enum variant.
    #[must_use]
    pub fn unit_variant(name: impl Into<String>) -> Self {
        Self::Variant {
            name: name.into(),
            value: None,
        }
    }

    /// Creates an enum variant carrying a payload.
    #[must_use]
    pub fn variant(name: impl Into<String>, payload: impl Into<Self>) -> Self {
        Self::Variant {
            name: name.into(),
            value: Some(Box::new(payload.into())),
        }
    }

    /// Creates a range value.
    #[must_use]
    pub fn range(start: impl Into<Self>, end: impl Into<Self>) -> Self {
        Self::structure([("start", start.into()), ("end", end.into())])
    }

    /// Returns the named field of a struct value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Short human-readable name of the value's shape.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::UInt(_) => "unsigned integer",
            Self::Int(_) => "signed integer",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Option(_) => "optional",
            Self::Seq(_) => "array",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
            Self::Variant { .. } => "enum variant",
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::UInt(u128::from(value))
            }
        })*
    };
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::Int(i128::from(value))
            }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128);
impl_from_signed!(i8, i16, i32, i64, i128);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Self::Option(value.map(|inner| Box::new(inner.into())))
    }
}
