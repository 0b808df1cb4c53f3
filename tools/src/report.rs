//! Human-readable renderings of values and registries.

use std::fmt;

use codec::Value;
use schema::{schema_fingerprint, FieldDef, Registry, TypeKind, ValueType, VariantPayload};
use serde::Serialize;

const INDENT: &str = "  ";

/// Summary of every type in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    pub fingerprint: u64,
    pub types: Vec<TypeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub kind: &'static str,
    /// Fields as `name: type`, positional items as `type`, variants as
    /// `ordinal Name payload`.
    pub members: Vec<String>,
}

/// Builds a [`SchemaReport`] in registration order.
pub fn schema_report(registry: &Registry) -> SchemaReport {
    let types = registry
        .types()
        .iter()
        .map(|def| {
            let (kind, members) = match &def.kind {
                TypeKind::Struct(fields) => {
                    ("struct", fields.iter().map(describe_field).collect())
                }
                TypeKind::TupleStruct(items) => {
                    ("tuple struct", items.iter().map(describe_type).collect())
                }
                TypeKind::UnitStruct => ("unit struct", Vec::new()),
                TypeKind::Enum(variants) => (
                    "enum",
                    variants
                        .iter()
                        .enumerate()
                        .map(|(ordinal, variant)| match &variant.payload {
                            VariantPayload::Unit => format!("{ordinal} {}", variant.name),
                            VariantPayload::Tuple(items) => {
                                let items = join(items.iter().map(describe_type));
                                format!("{ordinal} {}({items})", variant.name)
                            }
                            VariantPayload::Struct(fields) => {
                                let fields = join(fields.iter().map(describe_field));
                                format!("{ordinal} {} {{ {fields} }}", variant.name)
                            }
                        })
                        .collect(),
                ),
            };
            TypeSummary {
                name: def.name.clone(),
                kind,
                members,
            }
        })
        .collect();
    SchemaReport {
        fingerprint: schema_fingerprint(registry),
        types,
    }
}

/// Renders a report as indented text.
pub fn format_schema_report(report: &SchemaReport) -> String {
    report.to_string()
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fingerprint: 0x{:016x}", self.fingerprint)?;
        writeln!(f, "types: {}", self.types.len())?;
        for summary in &self.types {
            writeln!(f, "{} ({})", summary.name, summary.kind)?;
            for member in &summary.members {
                writeln!(f, "{INDENT}{member}")?;
            }
        }
        Ok(())
    }
}

fn describe_field(field: &FieldDef) -> String {
    format!("{}: {}", field.name, describe_type(&field.ty))
}

/// Rust-like spelling of a value type, e.g. `Option<Vec<u32>>`.
pub fn describe_type(ty: &ValueType) -> String {
    match ty {
        ValueType::Unit => "()".to_owned(),
        ValueType::Bool => "bool".to_owned(),
        ValueType::UInt { bytes } => format!("u{}", u32::from(*bytes) * 8),
        ValueType::Int { bytes } => format!("i{}", u32::from(*bytes) * 8),
        ValueType::Float { bytes } => format!("f{}", u32::from(*bytes) * 8),
        ValueType::String => "String".to_owned(),
        ValueType::Bytes => "Bytes".to_owned(),
        ValueType::Optional(inner) => format!("Option<{}>", describe_type(inner)),
        ValueType::Array { items, len: None } => format!("Vec<{}>", describe_type(items)),
        ValueType::Array {
            items,
            len: Some(len),
        } => format!("[{}; {len}]", describe_type(items)),
        ValueType::Map { key, value } => {
            format!("Map<{}, {}>", describe_type(key), describe_type(value))
        }
        ValueType::Tuple(items) => format!("({})", join(items.iter().map(describe_type))),
        ValueType::Range(bounds) => format!("Range<{}>", describe_type(bounds)),
        ValueType::Named(name) => name.clone(),
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

/// Renders a value as an indented tree.
pub fn format_pretty(value: &Value) -> String {
    Pretty(value).to_string()
}

struct Pretty<'v>(&'v Value);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.0, 0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Unit => f.write_str("()"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::UInt(v) => write!(f, "{v}"),
        Value::Int(v) => write!(f, "{v}"),
        Value::F32(v) => write!(f, "{v:?}"),
        Value::F64(v) => write!(f, "{v:?}"),
        Value::String(s) => write!(f, "{s:?}"),
        Value::Bytes(bytes) => {
            f.write_str("0x")?;
            bytes.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
        }
        Value::Option(None) => f.write_str("None"),
        Value::Option(Some(inner)) => {
            f.write_str("Some(")?;
            write_value(f, inner, depth)?;
            f.write_str(")")
        }
        Value::Seq(items) => write_block(f, "[", "]", items, depth, |f, item, depth| {
            write_value(f, item, depth)
        }),
        Value::Tuple(items) => write_block(f, "(", ")", items, depth, |f, item, depth| {
            write_value(f, item, depth)
        }),
        Value::Map(entries) => write_block(f, "{", "}", entries, depth, |f, (k, v), depth| {
            write_value(f, k, depth)?;
            f.write_str(" => ")?;
            write_value(f, v, depth)
        }),
        Value::Struct(fields) => {
            write_block(f, "{", "}", fields, depth, |f, (name, v), depth| {
                write!(f, "{name}: ")?;
                write_value(f, v, depth)
            })
        }
        Value::Variant { name, value } => {
            f.write_str(name)?;
            match value.as_deref() {
                None => Ok(()),
                Some(payload @ Value::Struct(_)) => {
                    f.write_str(" ")?;
                    write_value(f, payload, depth)
                }
                Some(Value::Tuple(items)) => {
                    write_block(f, "(", ")", items, depth, |f, item, depth| {
                        write_value(f, item, depth)
                    })
                }
                Some(payload) => {
                    f.write_str("(")?;
                    write_value(f, payload, depth)?;
                    f.write_str(")")
                }
            }
        }
    }
}

fn write_block<T>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: &[T],
    depth: usize,
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T, usize) -> fmt::Result,
) -> fmt::Result {
    f.write_str(open)?;
    if items.is_empty() {
        return f.write_str(close);
    }
    f.write_str("\n")?;
    for entry in items {
        f.write_str(&INDENT.repeat(depth + 1))?;
        item(f, entry, depth + 1)?;
        f.write_str(",\n")?;
    }
    f.write_str(&INDENT.repeat(depth))?;
    f.write_str(close)
}
