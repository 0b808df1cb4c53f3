//! Container type definitions: structs, tuple structs, unit structs, enums.

use crate::ValueType;

/// A named field of a struct or struct variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDef {
    pub name: String,
    pub ty: ValueType,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Payload carried by an enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum VariantPayload {
    Unit,
    Tuple(Vec<ValueType>),
    Struct(Vec<FieldDef>),
}

/// An enum variant. Its ordinal on the wire is its declaration index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantDef {
    pub name: String,
    pub payload: VariantPayload,
}

impl VariantDef {
    /// Creates a variant with no payload.
    #[must_use]
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: VariantPayload::Unit,
        }
    }

    /// Creates a variant with positional fields.
    #[must_use]
    pub fn tuple(name: impl Into<String>, fields: Vec<ValueType>) -> Self {
        Self {
            name: name.into(),
            payload: VariantPayload::Tuple(fields),
        }
    }

    /// Creates a variant with named fields.
    #[must_use]
    pub fn structure(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            payload: VariantPayload::Struct(fields),
        }
    }
}

/// The kind of a container type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TypeKind {
    /// Named fields in declaration order.
    Struct(Vec<FieldDef>),
    /// Positional fields in declaration order.
    TupleStruct(Vec<ValueType>),
    /// No fields; encodes to nothing.
    UnitStruct,
    /// Tagged variants in declaration order.
    Enum(Vec<VariantDef>),
}

/// A named container type.
///
/// Field and variant order is part of the wire contract: reordering either
/// changes the encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeDef {
    /// Creates a struct with named fields.
    #[must_use]
    pub fn structure(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Struct(fields),
        }
    }

    /// Creates a tuple struct with positional fields.
    #[must_use]
    pub fn tuple_struct(name: impl Into<String>, fields: Vec<ValueType>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::TupleStruct(fields),
        }
    }

    #[must_use]
    pub fn unit_struct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::UnitStruct,
        }
    }

    /// Creates an enum; ordinals follow the order of `variants`.
    #[must_use]
    pub fn enumeration(name: impl Into<String>, variants: Vec<VariantDef>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum(variants),
        }
    }

    /// Returns the enum variant with the given ordinal.
    #[must_use]
    pub fn variant(&self, ordinal: usize) -> Option<&VariantDef> {
        match &self.kind {
            TypeKind::Enum(variants) => variants.get(ordinal),
            _ => None,
        }
    }

    /// Returns the ordinal and definition of the enum variant named `name`.
    #[must_use]
    pub fn variant_by_name(&self, name: &str) -> Option<(usize, &VariantDef)> {
        match &self.kind {
            TypeKind::Enum(variants) => variants
                .iter()
                .enumerate()
                .find(|(_, variant)| variant.name == name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> TypeDef {
        TypeDef::enumeration(
            "Shape",
            vec![
                VariantDef::unit("Empty"),
                VariantDef::tuple("Circle", vec![ValueType::uint(4)]),
                VariantDef::structure(
                    "Rect",
                    vec![
                        FieldDef::new("w", ValueType::uint(4)),
                        FieldDef::new("h", ValueType::uint(4)),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn variant_ordinals_follow_declaration_order() {
        let shape = shape();
        assert_eq!(shape.variant(0).unwrap().name, "Empty");
        assert_eq!(shape.variant(2).unwrap().name, "Rect");
        assert!(shape.variant(3).is_none());
        assert_eq!(shape.variant_by_name("Circle").unwrap().0, 1);
        assert!(shape.variant_by_name("Triangle").is_none());
    }

    #[test]
    fn variant_lookup_on_struct_is_none() {
        let point = TypeDef::structure("Point", vec![FieldDef::new("x", ValueType::int(4))]);
        assert!(point.variant(0).is_none());
        assert!(point.variant_by_name("x").is_none());
    }
}
