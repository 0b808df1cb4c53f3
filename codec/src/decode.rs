//! Type-directed decoding.

use bytestream::{ByteError, ByteReader, Width};
use log::trace;
use schema::{FieldDef, Registry, TypeDef, TypeKind, ValueType, VariantPayload};

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::{CodecLimits, Value};

const OPTION_TYPE_NAME: &str = "Option";
const OPTION_VARIANTS: usize = 2;

/// Walks a registry type, reading its wire form into a [`Value`].
pub(crate) struct Decoder<'r> {
    registry: &'r Registry,
    limits: &'r CodecLimits,
    depth: usize,
}

impl<'r> Decoder<'r> {
    pub(crate) const fn new(registry: &'r Registry, limits: &'r CodecLimits) -> Self {
        Self {
            registry,
            limits,
            depth: 0,
        }
    }

    /// Decodes one value of the container type `def`.
    pub(crate) fn decode(mut self, r: &mut ByteReader<'_>, def: &'r TypeDef) -> CodecResult<Value> {
        self.enter()?;
        self.decode_def(r, def)
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

    fn read_container_len(&self, r: &mut ByteReader<'_>) -> CodecResult<usize> {
        let len = r.read_len()?;
        self.check_len(len)?;
        Ok(len)
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

    fn decode_def(&mut self, r: &mut ByteReader<'_>, def: &'r TypeDef) -> CodecResult<Value> {
        match &def.kind {
            TypeKind::Struct(fields) => self.decode_fields(r, fields),
            TypeKind::TupleStruct(items) => self.decode_positional(r, items),
            TypeKind::UnitStruct => Ok(Value::Unit),
            TypeKind::Enum(variants) => {
                let raw = r.read_varint(Width::LENGTH)?;
                let ordinal = u32::try_from(raw).unwrap_or(u32::MAX);
                let Some(variant) = variants.get(ordinal as usize) else {
                    return Err(CodecError::UnknownVariant {
                        type_name: def.name.clone(),
                        ordinal,
                        variants: variants.len(),
                    });
                };
                trace!("{}: ordinal {ordinal} -> {}", def.name, variant.name);
                let value = match &variant.payload {
                    VariantPayload::Unit => None,
                    VariantPayload::Tuple(items) => {
                        Some(Box::new(self.decode_positional(r, items)?))
                    }
                    VariantPayload::Struct(fields) => {
                        Some(Box::new(self.decode_fields(r, fields)?))
                    }
                };
                Ok(Value::Variant {
                    name: variant.name.clone(),
                    value,
                })
            }
        }
    }

    fn decode_value(&mut self, r: &mut ByteReader<'_>, ty: &'r ValueType) -> CodecResult<Value> {
        self.enter()?;
        let value = self.decode_shape(r, ty)?;
        self.depth -= 1;
        Ok(value)
    }

    fn decode_shape(&mut self, r: &mut ByteReader<'_>, ty: &'r ValueType) -> CodecResult<Value> {
        let value = match ty {
            ValueType::Unit => Value::Unit,
            ValueType::Bool => Value::Bool(r.read_bool()?),
            ValueType::UInt { bytes } => {
                Value::UInt(r.read_uint(Width::from_bytes(usize::from(*bytes))?)?)
            }
            ValueType::Int { bytes } => {
                Value::Int(r.read_int(Width::from_bytes(usize::from(*bytes))?)?)
            }
            ValueType::Float { bytes: 4 } => Value::F32(r.read_f32()?),
            ValueType::Float { bytes: 8 } => Value::F64(r.read_f64()?),
            ValueType::Float { bytes } => {
                return Err(ByteError::UnsupportedWidth {
                    bytes: usize::from(*bytes),
                }
                .into())
            }
            ValueType::String => Value::String(r.read_str()?),
            ValueType::Bytes => Value::Bytes(r.read_byte_array()?.to_vec()),
            ValueType::Optional(inner) => match r.read_varint(Width::LENGTH)? {
                0 => Value::Option(None),
                1 => Value::Option(Some(Box::new(self.decode_value(r, inner)?))),
                tag => {
                    return Err(CodecError::UnknownVariant {
                        type_name: OPTION_TYPE_NAME.to_owned(),
                        ordinal: u32::try_from(tag).unwrap_or(u32::MAX),
                        variants: OPTION_VARIANTS,
                    })
                }
            },
            ValueType::Array { items, len } => {
                let len = match len {
                    Some(len) => {
                        self.check_len(*len)?;
                        *len
                    }
                    None => self.read_container_len(r)?,
                };
                Value::Seq(r.read_seq_fixed(len, |r| self.decode_value(r, items))?)
            }
            ValueType::Map { key, value } => {
                let len = self.read_container_len(r)?;
                let entries = r.read_seq_fixed(len, |r| -> CodecResult<(Value, Value)> {
                    let k = self.decode_value(r, key)?;
                    let v = self.decode_value(r, value)?;
                    Ok((k, v))
                })?;
                Value::Map(entries)
            }
            ValueType::Tuple(types) => Value::Tuple(self.decode_elements(r, types)?),
            ValueType::Range(bounds) => {
                let start = self.decode_value(r, bounds)?;
                let end = self.decode_value(r, bounds)?;
                Value::range(start, end)
            }
            ValueType::Named(name) => {
                let registry = self.registry;
                let def = registry
                    .get(name)
                    .ok_or_else(|| CodecError::UnknownType { name: name.clone() })?;
                self.decode_def(r, def)?
            }
        };
        Ok(value)
    }

    /// A single positional field is returned directly, several as a tuple.
    fn decode_positional(
        &mut self,
        r: &mut ByteReader<'_>,
        items: &'r [ValueType],
    ) -> CodecResult<Value> {
        match items {
            [single] => self.decode_value(r, single),
            _ => Ok(Value::Tuple(self.decode_elements(r, items)?)),
        }
    }

    fn decode_elements(
        &mut self,
        r: &mut ByteReader<'_>,
        types: &'r [ValueType],
    ) -> CodecResult<Vec<Value>> {
        types.iter().map(|ty| self.decode_value(r, ty)).collect()
    }

    fn decode_fields(
        &mut self,
        r: &mut ByteReader<'_>,
        fields: &'r [FieldDef],
    ) -> CodecResult<Value> {
        let values = fields
            .iter()
            .map(|field| Ok((field.name.clone(), self.decode_value(r, &field.ty)?)))
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(Value::Struct(values))
    }
}
