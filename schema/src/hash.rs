//! Deterministic schema fingerprinting.

use blake3::Hasher;

use crate::{FieldDef, Registry, TypeKind, ValueType, VariantPayload};

/// Computes a deterministic fingerprint of every type in the registry.
///
/// Covers type, field and variant names, their declaration order and all
/// widths, so two peers with equal fingerprints agree on the wire format.
#[must_use]
pub fn schema_fingerprint(registry: &Registry) -> u64 {
    let mut hasher = Hasher::new();
    write_len(&mut hasher, registry.len());

    for def in registry.types() {
        write_str(&mut hasher, &def.name);
        match &def.kind {
            TypeKind::Struct(fields) => {
                write_u8(&mut hasher, 0);
                write_fields(&mut hasher, fields);
            }
            TypeKind::TupleStruct(items) => {
                write_u8(&mut hasher, 1);
                write_types(&mut hasher, items);
            }
            TypeKind::UnitStruct => {
                write_u8(&mut hasher, 2);
            }
            TypeKind::Enum(variants) => {
                write_u8(&mut hasher, 3);
                write_len(&mut hasher, variants.len());
                for variant in variants {
                    write_str(&mut hasher, &variant.name);
                    match &variant.payload {
                        VariantPayload::Unit => write_u8(&mut hasher, 0),
                        VariantPayload::Tuple(items) => {
                            write_u8(&mut hasher, 1);
                            write_types(&mut hasher, items);
                        }
                        VariantPayload::Struct(fields) => {
                            write_u8(&mut hasher, 2);
                            write_fields(&mut hasher, fields);
                        }
                    }
                }
            }
        }
    }

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn write_fields(hasher: &mut Hasher, fields: &[FieldDef]) {
    write_len(hasher, fields.len());
    for field in fields {
        write_str(hasher, &field.name);
        write_type(hasher, &field.ty);
    }
}

fn write_types(hasher: &mut Hasher, items: &[ValueType]) {
    write_len(hasher, items.len());
    for ty in items {
        write_type(hasher, ty);
    }
}

fn write_type(hasher: &mut Hasher, ty: &ValueType) {
    match ty {
        ValueType::Unit => write_u8(hasher, 0),
        ValueType::Bool => write_u8(hasher, 1),
        ValueType::UInt { bytes } => {
            write_u8(hasher, 2);
            write_u8(hasher, *bytes);
        }
        ValueType::Int { bytes } => {
            write_u8(hasher, 3);
            write_u8(hasher, *bytes);
        }
        ValueType::Float { bytes } => {
            write_u8(hasher, 4);
            write_u8(hasher, *bytes);
        }
        ValueType::String => write_u8(hasher, 5),
        ValueType::Bytes => write_u8(hasher, 6),
        ValueType::Optional(inner) => {
            write_u8(hasher, 7);
            write_type(hasher, inner);
        }
        ValueType::Array { items, len } => {
            write_u8(hasher, 8);
            write_type(hasher, items);
            match len {
                Some(len) => {
                    write_u8(hasher, 1);
                    write_len(hasher, *len);
                }
                None => write_u8(hasher, 0),
            }
        }
        ValueType::Map { key, value } => {
            write_u8(hasher, 9);
            write_type(hasher, key);
            write_type(hasher, value);
        }
        ValueType::Tuple(items) => {
            write_u8(hasher, 10);
            write_types(hasher, items);
        }
        ValueType::Range(bounds) => {
            write_u8(hasher, 11);
            write_type(hasher, bounds);
        }
        ValueType::Named(name) => {
            write_u8(hasher, 12);
            write_str(hasher, name);
        }
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_len(hasher: &mut Hasher, value: usize) {
    hasher.update(&(value as u64).to_le_bytes());
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TypeDef, VariantDef};

    fn registry(types: Vec<TypeDef>) -> Registry {
        Registry::new(types).unwrap()
    }

    #[test]
    fn fingerprint_is_stable() {
        let types = vec![TypeDef::structure(
            "Point",
            vec![
                FieldDef::new("x", ValueType::int(4)),
                FieldDef::new("y", ValueType::int(4)),
            ],
        )];
        let hash1 = schema_fingerprint(&registry(types.clone()));
        let hash2 = schema_fingerprint(&registry(types));
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn fingerprint_changes_with_field_order() {
        let a = TypeDef::structure(
            "Point",
            vec![
                FieldDef::new("x", ValueType::int(4)),
                FieldDef::new("y", ValueType::int(2)),
            ],
        );
        let b = TypeDef::structure(
            "Point",
            vec![
                FieldDef::new("y", ValueType::int(2)),
                FieldDef::new("x", ValueType::int(4)),
            ],
        );
        assert_ne!(
            schema_fingerprint(&registry(vec![a])),
            schema_fingerprint(&registry(vec![b]))
        );
    }

    #[test]
    fn fingerprint_changes_with_variant_order() {
        let a = TypeDef::enumeration("Mode", vec![VariantDef::unit("On"), VariantDef::unit("Off")]);
        let b = TypeDef::enumeration("Mode", vec![VariantDef::unit("Off"), VariantDef::unit("On")]);
        assert_ne!(
            schema_fingerprint(&registry(vec![a])),
            schema_fingerprint(&registry(vec![b]))
        );
    }

    #[test]
    fn fingerprint_changes_with_width() {
        let a = TypeDef::tuple_struct("Id", vec![ValueType::uint(4)]);
        let b = TypeDef::tuple_struct("Id", vec![ValueType::uint(8)]);
        assert_ne!(
            schema_fingerprint(&registry(vec![a])),
            schema_fingerprint(&registry(vec![b]))
        );
    }

    #[test]
    fn fingerprint_distinguishes_fixed_and_dynamic_arrays() {
        let a = TypeDef::tuple_struct("Buf", vec![ValueType::array(ValueType::uint(1))]);
        let b = TypeDef::tuple_struct("Buf", vec![ValueType::fixed_array(ValueType::uint(1), 0)]);
        assert_ne!(
            schema_fingerprint(&registry(vec![a])),
            schema_fingerprint(&registry(vec![b]))
        );
    }
}
