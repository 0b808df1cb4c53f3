//! Structural validation of values against registry types.
//!
//! Every (type, value) pairing is matched exhaustively; anything not listed
//! is a [`ShapeReason::TypeMismatch`]. Encoding only starts once a value has
//! passed this check, so a malformed value never produces partial output.

use bytestream::Width;
use schema::{FieldDef, Registry, TypeDef, TypeKind, ValueType, VariantPayload};

use crate::error::{CodecError, CodecResult, LimitKind, ShapeReason};
use crate::path::Path;
use crate::{CodecLimits, Value};

pub(crate) struct Checker<'r> {
    registry: &'r Registry,
    limits: &'r CodecLimits,
    path: Path,
    depth: usize,
}

impl<'r> Checker<'r> {
    pub(crate) fn new(registry: &'r Registry, limits: &'r CodecLimits, type_name: &str) -> Self {
        Self {
            registry,
            limits,
            path: Path::new(type_name),
            depth: 0,
        }
    }

    /// Checks `value` against the container type `def`.
    pub(crate) fn check(mut self, def: &'r TypeDef, value: &Value) -> CodecResult<()> {
        self.enter()?;
        self.check_def(def, value)
    }

    fn enter(&mut self) -> CodecResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::Depth,
                limit: self.limits.max_depth,
                actual: self.depth,
            });
        }
        Ok(())
    }

    fn check_len(&self, len: usize) -> CodecResult<()> {
        if len > self.limits.max_container_len {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::ContainerLen,
                limit: self.limits.max_container_len,
                actual: len,
            });
        }
        Ok(())
    }

    fn mismatch(&self, reason: ShapeReason) -> CodecError {
        CodecError::ShapeMismatch {
            path: self.path.to_string(),
            reason,
        }
    }

    fn type_mismatch(&self, expected: &'static str, found: &Value) -> CodecError {
        self.mismatch(ShapeReason::TypeMismatch {
            expected,
            found: found.kind(),
        })
    }

    fn resolve(&self, name: &str) -> CodecResult<&'r TypeDef> {
        self.registry
            .get(name)
            .ok_or_else(|| CodecError::UnknownType {
                name: name.to_owned(),
            })
    }

    fn check_value(&mut self, ty: &'r ValueType, value: &Value) -> CodecResult<()> {
        self.enter()?;
        self.check_shape(ty, value)?;
        self.depth -= 1;
        Ok(())
    }

    fn check_shape(&mut self, ty: &'r ValueType, value: &Value) -> CodecResult<()> {
        match (ty, value) {
            (ValueType::Unit, Value::Unit)
            | (ValueType::Bool, Value::Bool(_))
            | (ValueType::Float { bytes: 4 }, Value::F32(_))
            | (ValueType::Float { bytes: 8 }, Value::F64(_))
            | (ValueType::String, Value::String(_))
            | (ValueType::Bytes, Value::Bytes(_)) => Ok(()),
            (ValueType::UInt { bytes }, Value::UInt(v)) => {
                let width = Width::from_bytes(usize::from(*bytes))?;
                if width.fits_unsigned(*v) {
                    Ok(())
                } else {
                    Err(self.mismatch(ShapeReason::UnsignedOutOfRange { width, value: *v }))
                }
            }
            (ValueType::Int { bytes }, Value::Int(v)) => {
                let width = Width::from_bytes(usize::from(*bytes))?;
                if width.fits_signed(*v) {
                    Ok(())
                } else {
                    Err(self.mismatch(ShapeReason::SignedOutOfRange { width, value: *v }))
                }
            }
            (ValueType::Optional(inner), Value::Option(present)) => match present {
                Some(v) => self.check_value(inner, v),
                None => Ok(()),
            },
            (ValueType::Array { items, len }, Value::Seq(values)) => {
                if let Some(expected) = *len {
                    if values.len() != expected {
                        return Err(self.mismatch(ShapeReason::FixedLengthMismatch {
                            expected,
                            found: values.len(),
                        }));
                    }
                }
                self.check_len(values.len())?;
                for (index, v) in values.iter().enumerate() {
                    self.path.push_index(index);
                    self.check_value(items, v)?;
                    self.path.pop();
                }
                Ok(())
            }
            (ValueType::Map { key, value: value_ty }, Value::Map(entries)) => {
                self.check_len(entries.len())?;
                for (index, (k, v)) in entries.iter().enumerate() {
                    self.path.push_map_key(index);
                    self.check_value(key, k)?;
                    self.path.pop();
                    self.path.push_map_value(index);
                    self.check_value(value_ty, v)?;
                    self.path.pop();
                }
                Ok(())
            }
            (ValueType::Tuple(types), Value::Tuple(values)) => self.check_elements(types, values),
            (ValueType::Range(bounds), Value::Struct(fields)) => {
                let declared = [("start", &**bounds), ("end", &**bounds)];
                self.check_fields(declared.into_iter(), fields)
            }
            (ValueType::Named(name), v) => {
                let def = self.resolve(name)?;
                self.check_def(def, v)
            }
            (ty, v) => Err(self.type_mismatch(expected_name(ty), v)),
        }
    }

    fn check_def(&mut self, def: &'r TypeDef, value: &Value) -> CodecResult<()> {
        match (&def.kind, value) {
            (TypeKind::Struct(fields), Value::Struct(values)) => {
                self.check_fields(declared_fields(fields), values)
            }
            (TypeKind::TupleStruct(items), v) => self.check_positional(items, v),
            (TypeKind::UnitStruct, Value::Unit) => Ok(()),
            (TypeKind::Enum(_), Value::Variant { name, value }) => {
                let Some((_, variant)) = def.variant_by_name(name) else {
                    return Err(self.mismatch(ShapeReason::UnknownVariantName {
                        name: name.clone(),
                    }));
                };
                self.path.push_variant(name);
                self.check_payload(&variant.payload, value.as_deref())?;
                self.path.pop();
                Ok(())
            }
            (kind, v) => Err(self.type_mismatch(kind_name(kind), v)),
        }
    }

    fn check_payload(
        &mut self,
        payload: &'r VariantPayload,
        value: Option<&Value>,
    ) -> CodecResult<()> {
        match (payload, value) {
            (VariantPayload::Unit, None) => Ok(()),
            (VariantPayload::Unit, Some(v)) => Err(self.type_mismatch("unit variant", v)),
            (VariantPayload::Tuple(items), Some(v)) => self.check_positional(items, v),
            (VariantPayload::Struct(fields), Some(Value::Struct(values))) => {
                self.check_fields(declared_fields(fields), values)
            }
            (VariantPayload::Struct(_), Some(v)) => Err(self.type_mismatch("struct", v)),
            (_, None) => Err(self.mismatch(ShapeReason::TypeMismatch {
                expected: "variant payload",
                found: "nothing",
            })),
        }
    }

    /// A single positional field is carried directly, several as a tuple.
    fn check_positional(&mut self, items: &'r [ValueType], value: &Value) -> CodecResult<()> {
        match (items, value) {
            ([single], v) => self.check_value(single, v),
            (_, Value::Tuple(values)) => self.check_elements(items, values),
            (_, v) => Err(self.type_mismatch("tuple", v)),
        }
    }

    fn check_elements(&mut self, types: &'r [ValueType], values: &[Value]) -> CodecResult<()> {
        if types.len() != values.len() {
            return Err(self.mismatch(ShapeReason::ArityMismatch {
                expected: types.len(),
                found: values.len(),
            }));
        }
        for (index, (ty, v)) in types.iter().zip(values).enumerate() {
            self.path.push_element(index);
            self.check_value(ty, v)?;
            self.path.pop();
        }
        Ok(())
    }

    fn check_fields<I>(&mut self, declared: I, values: &[(String, Value)]) -> CodecResult<()>
    where
        I: Iterator<Item = (&'r str, &'r ValueType)> + Clone,
    {
        for (name, _) in values {
            let occurrences = values.iter().filter(|(other, _)| other == name).count();
            if occurrences > 1 || !declared.clone().any(|(field, _)| field == name) {
                return Err(self.mismatch(ShapeReason::UnexpectedField {
                    field: name.clone(),
                }));
            }
        }
        for (name, ty) in declared {
            let Some((_, v)) = values.iter().find(|(field, _)| field == name) else {
                return Err(self.mismatch(ShapeReason::MissingField {
                    field: name.to_owned(),
                }));
            };
            self.path.push_field(name);
            self.check_value(ty, v)?;
            self.path.pop();
        }
        Ok(())
    }
}

pub(crate) fn declared_fields(
    fields: &[FieldDef],
) -> impl Iterator<Item = (&str, &ValueType)> + Clone {
    fields.iter().map(|field| (field.name.as_str(), &field.ty))
}

const fn expected_name(ty: &ValueType) -> &'static str {
    match ty {
        ValueType::Float { bytes: 4 } => "f32",
        ValueType::Float { bytes: 8 } => "f64",
        other => other.kind_name(),
    }
}

const fn kind_name(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Struct(_) => "struct",
        TypeKind::TupleStruct(_) => "tuple struct",
        TypeKind::UnitStruct => "unit",
        TypeKind::Enum(_) => "enum variant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::VariantDef;

    fn registry() -> Registry {
        Registry::builder()
            .register(TypeDef::structure(
                "Item",
                vec![
                    FieldDef::new("name", ValueType::string()),
                    FieldDef::new("qty", ValueType::uint(2)),
                ],
            ))
            .register(TypeDef::structure(
                "Order",
                vec![
                    FieldDef::new("id", ValueType::uint(8)),
                    FieldDef::new("items", ValueType::array(ValueType::named("Item"))),
                ],
            ))
            .register(TypeDef::enumeration(
                "Shape",
                vec![
                    VariantDef::unit("Empty"),
                    VariantDef::tuple("Circle", vec![ValueType::float(4)]),
                    VariantDef::tuple("Line", vec![ValueType::int(4), ValueType::int(4)]),
                ],
            ))
            .build()
            .unwrap()
    }

    fn check(registry: &Registry, type_name: &str, value: &Value) -> CodecResult<()> {
        let limits = CodecLimits::default();
        let def = registry.get(type_name).unwrap();
        Checker::new(registry, &limits, type_name).check(def, value)
    }

    fn item(name: &str, qty: Value) -> Value {
        Value::structure([("name", Value::from(name)), ("qty", qty)])
    }

    fn order(items: Vec<Value>) -> Value {
        Value::structure([("id", Value::from(7u64)), ("items", Value::Seq(items))])
    }

    #[test]
    fn accepts_well_formed_order() {
        let registry = registry();
        let value = order(vec![item("pen", Value::from(2u16)), item("ink", Value::from(1u16))]);
        assert!(check(&registry, "Order", &value).is_ok());
    }

    #[test]
    fn reports_nested_path() {
        let registry = registry();
        let value = order(vec![
            item("pen", Value::from(2u16)),
            item("ink", Value::from(1u16)),
            item("pad", Value::from("three")),
        ]);
        let err = check(&registry, "Order", &value).unwrap_err();
        assert_eq!(
            err,
            CodecError::ShapeMismatch {
                path: "Order.items[2].qty".into(),
                reason: ShapeReason::TypeMismatch {
                    expected: "unsigned integer",
                    found: "string",
                },
            }
        );
    }

    #[test]
    fn reports_integer_out_of_range() {
        let registry = registry();
        let value = order(vec![item("pen", Value::UInt(70_000))]);
        let err = check(&registry, "Order", &value).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ShapeMismatch {
                reason: ShapeReason::UnsignedOutOfRange {
                    width: Width::W2,
                    value: 70_000
                },
                ..
            }
        ));
    }

    #[test]
    fn reports_missing_and_unexpected_fields() {
        let registry = registry();
        let missing = Value::structure([("name", Value::from("pen"))]);
        let err = check(&registry, "Item", &missing).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ShapeMismatch {
                reason: ShapeReason::MissingField { ref field },
                ..
            } if field == "qty"
        ));

        let extra = Value::structure([
            ("name", Value::from("pen")),
            ("qty", Value::from(1u16)),
            ("color", Value::from("red")),
        ]);
        let err = check(&registry, "Item", &extra).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ShapeMismatch {
                reason: ShapeReason::UnexpectedField { ref field },
                ..
            } if field == "color"
        ));
    }

    #[test]
    fn checks_variant_payloads() {
        let registry = registry();
        assert!(check(&registry, "Shape", &Value::unit_variant("Empty")).is_ok());
        assert!(check(&registry, "Shape", &Value::variant("Circle", 1.5f32)).is_ok());
        let line = Value::variant(
            "Line",
            Value::Tuple(vec![Value::from(1i32), Value::from(-1i32)]),
        );
        assert!(check(&registry, "Shape", &line).is_ok());

        let err = check(&registry, "Shape", &Value::unit_variant("Circle")).unwrap_err();
        assert!(matches!(err, CodecError::ShapeMismatch { .. }));

        let err = check(&registry, "Shape", &Value::unit_variant("Square")).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ShapeMismatch { reason: ShapeReason::UnknownVariantName { .. }, .. }
        ));

        let short = Value::variant("Line", Value::Tuple(vec![Value::from(1i32)]));
        let err = check(&registry, "Shape", &short).unwrap_err();
        assert_eq!(
            err,
            CodecError::ShapeMismatch {
                path: "Shape::Line".into(),
                reason: ShapeReason::ArityMismatch {
                    expected: 2,
                    found: 1
                },
            }
        );
    }

    #[test]
    fn rejects_wrong_float_width() {
        let registry = registry();
        let err = check(&registry, "Shape", &Value::variant("Circle", 1.5f64)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ShapeMismatch {
                reason: ShapeReason::TypeMismatch { expected: "f32", found: "f64" },
                ..
            }
        ));
    }

    #[test]
    fn enforces_depth_limit() {
        let registry = Registry::builder()
            .register(TypeDef::tuple_struct(
                "Nest",
                vec![ValueType::optional(ValueType::named("Nest"))],
            ))
            .build()
            .unwrap();
        let mut value = Value::none();
        for _ in 0..40 {
            value = Value::Option(Some(Box::new(value)));
        }
        let limits = CodecLimits::for_testing();
        let def = registry.get("Nest").unwrap();
        let err = Checker::new(&registry, &limits, "Nest")
            .check(def, &value)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitsExceeded {
                kind: LimitKind::Depth,
                ..
            }
        ));
    }
}
