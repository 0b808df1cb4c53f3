//! Type-directed encoding of checked values.

use bytestream::{ByteWriter, Width};
use log::trace;
use schema::{Registry, TypeDef, TypeKind, ValueType, VariantPayload};

use crate::check::declared_fields;
use crate::error::{CodecError, CodecResult, ShapeReason};
use crate::{CodecConfig, MapOrder, Value};

const OPTION_NONE: u128 = 0;
const OPTION_SOME: u128 = 1;

/// Walks a registry type and a value together, writing the wire form.
///
/// Values are expected to have passed the shape check; a pairing the check
/// would have rejected surfaces as a `ShapeMismatch` at the root path.
pub(crate) struct Encoder<'r> {
    registry: &'r Registry,
    config: &'r CodecConfig,
    root: &'r str,
}

impl<'r> Encoder<'r> {
    pub(crate) const fn new(
        registry: &'r Registry,
        config: &'r CodecConfig,
        root: &'r str,
    ) -> Self {
        Self {
            registry,
            config,
            root,
        }
    }

    fn mismatch(&self, reason: ShapeReason) -> CodecError {
        CodecError::ShapeMismatch {
            path: self.root.to_owned(),
            reason,
        }
    }

    fn type_mismatch(&self, expected: &'static str, found: &Value) -> CodecError {
        self.mismatch(ShapeReason::TypeMismatch {
            expected,
            found: found.kind(),
        })
    }

    pub(crate) fn encode_def(
        &self,
        w: &mut ByteWriter,
        def: &TypeDef,
        value: &Value,
    ) -> CodecResult<()> {
        match (&def.kind, value) {
            (TypeKind::Struct(fields), Value::Struct(values)) => {
                self.encode_fields(w, declared_fields(fields), values)
            }
            (TypeKind::TupleStruct(items), v) => self.encode_positional(w, items, v),
            (TypeKind::UnitStruct, Value::Unit) => Ok(()),
            (TypeKind::Enum(_), Value::Variant { name, value }) => {
                let (ordinal, variant) = def.variant_by_name(name).ok_or_else(|| {
                    self.mismatch(ShapeReason::UnknownVariantName { name: name.clone() })
                })?;
                trace!("{}::{} -> ordinal {ordinal}", def.name, variant.name);
                w.write_varint(ordinal as u128, Width::LENGTH)?;
                self.encode_payload(w, &variant.payload, value.as_deref())
            }
            (_, v) => Err(self.type_mismatch("value of a registered type", v)),
        }
    }

    fn encode_value(&self, w: &mut ByteWriter, ty: &ValueType, value: &Value) -> CodecResult<()> {
        match (ty, value) {
            (ValueType::Unit, Value::Unit) => {}
            (ValueType::Bool, Value::Bool(b)) => w.write_bool(*b),
            (ValueType::UInt { bytes }, Value::UInt(v)) => {
                w.write_uint(*v, Width::from_bytes(usize::from(*bytes))?)?;
            }
            (ValueType::Int { bytes }, Value::Int(v)) => {
                w.write_int(*v, Width::from_bytes(usize::from(*bytes))?)?;
            }
            (ValueType::Float { bytes: 4 }, Value::F32(v)) => w.write_f32(*v),
            (ValueType::Float { bytes: 8 }, Value::F64(v)) => w.write_f64(*v),
            (ValueType::String, Value::String(s)) => w.write_str(s)?,
            (ValueType::Bytes, Value::Bytes(b)) => w.write_byte_array(b)?,
            (ValueType::Optional(inner), Value::Option(present)) => match present {
                Some(v) => {
                    w.write_varint(OPTION_SOME, Width::LENGTH)?;
                    self.encode_value(w, inner, v)?;
                }
                None => w.write_varint(OPTION_NONE, Width::LENGTH)?,
            },
            (ValueType::Array { items, len: None }, Value::Seq(values)) => {
                w.write_seq(values, |w, v| self.encode_value(w, items, v))?;
            }
            (ValueType::Array { items, len: Some(_) }, Value::Seq(values)) => {
                w.write_seq_fixed(values, |w, v| self.encode_value(w, items, v))?;
            }
            (ValueType::Map { key, value: value_ty }, Value::Map(entries)) => {
                self.encode_map(w, key, value_ty, entries)?;
            }
            (ValueType::Tuple(types), Value::Tuple(values)) => {
                self.encode_elements(w, types, values)?;
            }
            (ValueType::Range(bounds), Value::Struct(fields)) => {
                let declared = [("start", &**bounds), ("end", &**bounds)];
                self.encode_fields(w, declared.into_iter(), fields)?;
            }
            (ValueType::Named(name), v) => {
                let def = self
                    .registry
                    .get(name)
                    .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
                self.encode_def(w, def, v)?;
            }
            (ty, v) => return Err(self.type_mismatch(ty.kind_name(), v)),
        }
        Ok(())
    }

    fn encode_map(
        &self,
        w: &mut ByteWriter,
        key: &ValueType,
        value_ty: &ValueType,
        entries: &[(Value, Value)],
    ) -> CodecResult<()> {
        match self.config.map_order {
            MapOrder::Preserve => w.write_map(entries.iter().map(|(k, v)| (k, v)), |w, k, v| {
                self.encode_value(w, key, k)?;
                self.encode_value(w, value_ty, v)
            }),
            MapOrder::Canonical => {
                let mut encoded = entries
                    .iter()
                    .map(|(k, v)| {
                        let mut entry = ByteWriter::new();
                        self.encode_value(&mut entry, key, k)?;
                        let key_len = entry.bytes_written();
                        self.encode_value(&mut entry, value_ty, v)?;
                        Ok((entry.finish(), key_len))
                    })
                    .collect::<CodecResult<Vec<_>>>()?;
                encoded.sort_by(|(a, a_len), (b, b_len)| a[..*a_len].cmp(&b[..*b_len]));
                w.write_seq(&encoded, |w, (entry, _)| {
                    w.write_bytes(entry);
                    Ok::<(), CodecError>(())
                })
            }
        }
    }

    fn encode_payload(
        &self,
        w: &mut ByteWriter,
        payload: &VariantPayload,
        value: Option<&Value>,
    ) -> CodecResult<()> {
        match (payload, value) {
            (VariantPayload::Unit, None) => Ok(()),
            (VariantPayload::Tuple(items), Some(v)) => self.encode_positional(w, items, v),
            (VariantPayload::Struct(fields), Some(Value::Struct(values))) => {
                self.encode_fields(w, declared_fields(fields), values)
            }
            (_, Some(v)) => Err(self.type_mismatch("variant payload", v)),
            (_, None) => Err(self.mismatch(ShapeReason::TypeMismatch {
                expected: "variant payload",
                found: "nothing",
            })),
        }
    }

    fn encode_positional(
        &self,
        w: &mut ByteWriter,
        items: &[ValueType],
        value: &Value,
    ) -> CodecResult<()> {
        match (items, value) {
            ([single], v) => self.encode_value(w, single, v),
            (_, Value::Tuple(values)) => self.encode_elements(w, items, values),
            (_, v) => Err(self.type_mismatch("tuple", v)),
        }
    }

    fn encode_elements(
        &self,
        w: &mut ByteWriter,
        types: &[ValueType],
        values: &[Value],
    ) -> CodecResult<()> {
        if types.len() != values.len() {
            return Err(self.mismatch(ShapeReason::ArityMismatch {
                expected: types.len(),
                found: values.len(),
            }));
        }
        w.write_seq_fixed(types.iter().zip(values), |w, (ty, v)| self.encode_value(w, ty, v))
    }

    fn encode_fields<'t, I>(
        &self,
        w: &mut ByteWriter,
        declared: I,
        values: &[(String, Value)],
    ) -> CodecResult<()>
    where
        I: Iterator<Item = (&'t str, &'t ValueType)>,
    {
        for (name, ty) in declared {
            let (_, v) = values.iter().find(|(field, _)| field == name).ok_or_else(|| {
                self.mismatch(ShapeReason::MissingField {
                    field: name.to_owned(),
                })
            })?;
            self.encode_value(w, ty, v)?;
        }
        Ok(())
    }
}
