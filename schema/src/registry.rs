//! The type registry and its validation.

use std::collections::{HashMap, HashSet};

use crate::error::{SchemaError, SchemaResult};
use crate::{FieldDef, TypeDef, TypeKind, ValueType, VariantPayload};

const INTEGER_WIDTHS: [u8; 5] = [1, 2, 4, 8, 16];
const FLOAT_WIDTHS: [u8; 2] = [4, 8];

/// A validated, immutable set of container types indexed by name.
///
/// Built once and passed explicitly to every encode and decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<TypeDef>", into = "Vec<TypeDef>")
)]
pub struct Registry {
    types: Vec<TypeDef>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates a registry from type definitions after validation.
    pub fn new(types: Vec<TypeDef>) -> SchemaResult<Self> {
        let mut index = HashMap::with_capacity(types.len());
        for (position, def) in types.iter().enumerate() {
            if index.insert(def.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateType {
                    name: def.name.clone(),
                });
            }
        }
        let registry = Self { types, index };
        registry.validate()?;
        Ok(registry)
    }

    /// Creates a registry builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.index.get(name).map(|&position| &self.types[position])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All types in registration order.
    #[must_use]
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Validates registry invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        for def in &self.types {
            match &def.kind {
                TypeKind::Struct(fields) => self.validate_fields(&def.name, fields)?,
                TypeKind::TupleStruct(items) => {
                    for ty in items {
                        self.validate_type(&def.name, ty)?;
                    }
                }
                TypeKind::UnitStruct => {}
                TypeKind::Enum(variants) => {
                    if variants.is_empty() {
                        return Err(SchemaError::EmptyEnum {
                            name: def.name.clone(),
                        });
                    }
                    let mut names = HashSet::new();
                    for variant in variants {
                        if !names.insert(variant.name.as_str()) {
                            return Err(SchemaError::DuplicateVariant {
                                owner: def.name.clone(),
                                variant: variant.name.clone(),
                            });
                        }
                        let owner = format!("{}::{}", def.name, variant.name);
                        match &variant.payload {
                            VariantPayload::Unit => {}
                            VariantPayload::Tuple(items) => {
                                for ty in items {
                                    self.validate_type(&owner, ty)?;
                                }
                            }
                            VariantPayload::Struct(fields) => {
                                self.validate_fields(&owner, fields)?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_fields(&self, owner: &str, fields: &[FieldDef]) -> SchemaResult<()> {
        let mut names = HashSet::new();
        for field in fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    owner: owner.to_owned(),
                    field: field.name.clone(),
                });
            }
            self.validate_type(owner, &field.ty)?;
        }
        Ok(())
    }

    fn validate_type(&self, owner: &str, ty: &ValueType) -> SchemaResult<()> {
        match ty {
            ValueType::Unit | ValueType::Bool | ValueType::String | ValueType::Bytes => Ok(()),
            ValueType::UInt { bytes } | ValueType::Int { bytes } => {
                if INTEGER_WIDTHS.contains(bytes) {
                    Ok(())
                } else {
                    Err(SchemaError::InvalidWidth {
                        owner: owner.to_owned(),
                        bytes: *bytes,
                    })
                }
            }
            ValueType::Float { bytes } => {
                if FLOAT_WIDTHS.contains(bytes) {
                    Ok(())
                } else {
                    Err(SchemaError::InvalidFloatWidth {
                        owner: owner.to_owned(),
                        bytes: *bytes,
                    })
                }
            }
            ValueType::Optional(inner) | ValueType::Range(inner) => {
                self.validate_type(owner, inner)
            }
            ValueType::Array { items, .. } => self.validate_type(owner, items),
            ValueType::Map { key, value } => {
                if !key.is_valid_map_key() {
                    return Err(SchemaError::InvalidMapKey {
                        owner: owner.to_owned(),
                    });
                }
                self.validate_type(owner, key)?;
                self.validate_type(owner, value)
            }
            ValueType::Tuple(items) => items
                .iter()
                .try_for_each(|item| self.validate_type(owner, item)),
            ValueType::Named(name) => {
                if self.contains(name) {
                    Ok(())
                } else {
                    Err(SchemaError::UnresolvedType {
                        name: name.clone(),
                        referenced_by: owner.to_owned(),
                    })
                }
            }
        }
    }
}

impl TryFrom<Vec<TypeDef>> for Registry {
    type Error = SchemaError;

    fn try_from(types: Vec<TypeDef>) -> SchemaResult<Self> {
        Self::new(types)
    }
}

impl From<Registry> for Vec<TypeDef> {
    fn from(registry: Registry) -> Self {
        registry.types
    }
}

/// Builder for `Registry`.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: Vec<TypeDef>,
}

impl RegistryBuilder {
    /// Adds a type definition.
    #[must_use]
    pub fn register(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    /// Builds the registry after validation.
    pub fn build(self) -> SchemaResult<Registry> {
        Registry::new(self.types)
    }
}
