//! JSON mapping for codec values.
//!
//! Structs map to objects, tuples and arrays to arrays, enums to
//! `{"tag": name, "value": payload}`, options to `null` or the value, ranges
//! to `{"start", "end"}`. Non-empty maps with string keys become objects, all
//! other maps arrays of `[key, value]` pairs; `{}` reads as an empty map of any
//! key type. Integers beyond 64 bits are decimal strings.
//!
//! A present option whose value is itself written as `null` (unit, an option,
//! a unit struct) is wrapped in a one-element array, so `Some(None)` is
//! `[null]` and `None` is `null`.

use anyhow::{anyhow, bail, Context, Result};
use codec::Value;
use schema::{FieldDef, Registry, TypeDef, TypeKind, ValueType, VariantPayload};
use serde_json::{Map, Number, Value as Json};

/// Key holding the variant name of an enum value.
pub const TAG_KEY: &str = "tag";
/// Key holding the payload of a non-unit enum value.
pub const VALUE_KEY: &str = "value";

/// Converts JSON into a value of `type_name`, guided by the registry.
pub fn json_to_value(registry: &Registry, type_name: &str, json: &Json) -> Result<Value> {
    let def = registry
        .get(type_name)
        .ok_or_else(|| anyhow!("unknown type '{type_name}'"))?;
    JsonReader { registry }.def(def, json, type_name)
}

struct JsonReader<'r> {
    registry: &'r Registry,
}

impl JsonReader<'_> {
    fn def(&self, def: &TypeDef, json: &Json, path: &str) -> Result<Value> {
        match &def.kind {
            TypeKind::Struct(fields) => self.fields(fields, json, path),
            TypeKind::TupleStruct(items) => self.positional(items, json, path),
            TypeKind::UnitStruct => unit(json, path),
            TypeKind::Enum(_) => {
                let object = json
                    .as_object()
                    .ok_or_else(|| anyhow!("{path}: expected {{\"{TAG_KEY}\": ..}} object"))?;
                let name = object
                    .get(TAG_KEY)
                    .and_then(Json::as_str)
                    .ok_or_else(|| anyhow!("{path}: missing string \"{TAG_KEY}\""))?;
                let (_, variant) = def
                    .variant_by_name(name)
                    .ok_or_else(|| anyhow!("{path}: unknown variant '{name}'"))?;
                let path = format!("{path}::{name}");
                let payload = object.get(VALUE_KEY);
                let value = match (&variant.payload, payload) {
                    (VariantPayload::Unit, None | Some(Json::Null)) => None,
                    (VariantPayload::Unit, Some(_)) => bail!("{path}: unit variant takes no value"),
                    (_, None) => bail!("{path}: missing \"{VALUE_KEY}\""),
                    (VariantPayload::Tuple(items), Some(json)) => {
                        Some(Box::new(self.positional(items, json, &path)?))
                    }
                    (VariantPayload::Struct(fields), Some(json)) => {
                        Some(Box::new(self.fields(fields, json, &path)?))
                    }
                };
                Ok(Value::Variant {
                    name: name.to_owned(),
                    value,
                })
            }
        }
    }

    fn fields(&self, fields: &[FieldDef], json: &Json, path: &str) -> Result<Value> {
        let object = json
            .as_object()
            .ok_or_else(|| anyhow!("{path}: expected object"))?;
        if let Some(unknown) = object
            .keys()
            .find(|key| !fields.iter().any(|field| &field.name == *key))
        {
            bail!("{path}: unexpected field '{unknown}'");
        }
        let values = fields
            .iter()
            .map(|field| {
                let path = format!("{path}.{}", field.name);
                let json = object
                    .get(&field.name)
                    .ok_or_else(|| anyhow!("{path}: missing field"))?;
                Ok((field.name.clone(), self.value(&field.ty, json, &path)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Struct(values))
    }

    fn positional(&self, items: &[ValueType], json: &Json, path: &str) -> Result<Value> {
        match items {
            [single] => self.value(single, json, path),
            _ => Ok(Value::Tuple(self.elements(items, json, path)?)),
        }
    }

    fn elements(&self, types: &[ValueType], json: &Json, path: &str) -> Result<Vec<Value>> {
        let array = array(json, path)?;
        if array.len() != types.len() {
            bail!("{path}: expected {} elements, got {}", types.len(), array.len());
        }
        types
            .iter()
            .zip(array)
            .enumerate()
            .map(|(index, (ty, json))| self.value(ty, json, &format!("{path}.{index}")))
            .collect()
    }

    fn value(&self, ty: &ValueType, json: &Json, path: &str) -> Result<Value> {
        let value = match ty {
            ValueType::Unit => unit(json, path)?,
            ValueType::Bool => Value::Bool(
                json.as_bool()
                    .ok_or_else(|| anyhow!("{path}: expected bool"))?,
            ),
            ValueType::UInt { .. } => Value::UInt(unsigned(json, path)?),
            ValueType::Int { .. } => Value::Int(signed(json, path)?),
            ValueType::Float { bytes } => {
                let float = json
                    .as_f64()
                    .ok_or_else(|| anyhow!("{path}: expected number"))?;
                if *bytes == 4 {
                    #[allow(clippy::cast_possible_truncation)]
                    let narrowed = float as f32;
                    Value::F32(narrowed)
                } else {
                    Value::F64(float)
                }
            }
            ValueType::String => Value::String(
                json.as_str()
                    .ok_or_else(|| anyhow!("{path}: expected string"))?
                    .to_owned(),
            ),
            ValueType::Bytes => Value::Bytes(
                array(json, path)?
                    .iter()
                    .enumerate()
                    .map(|(index, byte)| {
                        byte.as_u64()
                            .and_then(|byte| u8::try_from(byte).ok())
                            .ok_or_else(|| anyhow!("{path}[{index}]: expected byte"))
                    })
                    .collect::<Result<_>>()?,
            ),
            ValueType::Optional(inner) => match json {
                Json::Null => Value::none(),
                json if self.writes_null(inner) => match json.as_array().map(Vec::as_slice) {
                    Some([json]) => Value::some(self.value(inner, json, path)?),
                    _ => bail!("{path}: expected null or [value]"),
                },
                json => Value::some(self.value(inner, json, path)?),
            },
            ValueType::Array { items, .. } => Value::Seq(
                array(json, path)?
                    .iter()
                    .enumerate()
                    .map(|(index, json)| self.value(items, json, &format!("{path}[{index}]")))
                    .collect::<Result<_>>()?,
            ),
            ValueType::Map { key, value } => Value::Map(self.map(key, value, json, path)?),
            ValueType::Tuple(types) => Value::Tuple(self.elements(types, json, path)?),
            ValueType::Range(bounds) => {
                let object = json
                    .as_object()
                    .ok_or_else(|| anyhow!("{path}: expected {{\"start\", \"end\"}} object"))?;
                let bound = |name: &str| {
                    let path = format!("{path}.{name}");
                    let json = object
                        .get(name)
                        .ok_or_else(|| anyhow!("{path}: missing field"))?;
                    self.value(bounds, json, &path)
                };
                Value::range(bound("start")?, bound("end")?)
            }
            ValueType::Named(name) => {
                let def = self
                    .registry
                    .get(name)
                    .ok_or_else(|| anyhow!("{path}: unknown type '{name}'"))?;
                self.def(def, json, path)?
            }
        };
        Ok(value)
    }

    /// Whether a present value of `ty` is written as JSON `null`.
    fn writes_null<'a>(&'a self, mut ty: &'a ValueType) -> bool {
        // Bounded so a self-referencing newtype cannot loop.
        for _ in 0..=self.registry.len() {
            match ty {
                ValueType::Unit | ValueType::Optional(_) => return true,
                ValueType::Named(name) => match self.registry.get(name).map(|def| &def.kind) {
                    Some(TypeKind::UnitStruct) => return true,
                    Some(TypeKind::TupleStruct(items)) if items.len() == 1 => ty = &items[0],
                    _ => return false,
                },
                _ => return false,
            }
        }
        false
    }

    fn map(
        &self,
        key: &ValueType,
        value: &ValueType,
        json: &Json,
        path: &str,
    ) -> Result<Vec<(Value, Value)>> {
        match (key, json) {
            (ValueType::String, Json::Object(object)) => {
                return object
                    .iter()
                    .map(|(k, v)| {
                        let entry = self.value(value, v, &format!("{path}.{k}"))?;
                        Ok((Value::String(k.clone()), entry))
                    })
                    .collect();
            }
            (_, Json::Object(object)) if object.is_empty() => return Ok(Vec::new()),
            _ => {}
        }
        array(json, path)?
            .iter()
            .enumerate()
            .map(|(index, pair)| {
                let path = format!("{path}[{index}]");
                match pair.as_array().map(Vec::as_slice) {
                    Some([k, v]) => Ok((
                        self.value(key, k, &format!("{path}.key"))?,
                        self.value(value, v, &format!("{path}.value"))?,
                    )),
                    _ => bail!("{path}: expected [key, value] pair"),
                }
            })
            .collect()
    }
}

fn unit(json: &Json, path: &str) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Unit),
        Json::Array(items) if items.is_empty() => Ok(Value::Unit),
        _ => bail!("{path}: expected null"),
    }
}

fn array<'j>(json: &'j Json, path: &str) -> Result<&'j Vec<Json>> {
    json.as_array()
        .ok_or_else(|| anyhow!("{path}: expected array"))
}

fn unsigned(json: &Json, path: &str) -> Result<u128> {
    match json {
        Json::Number(number) => number
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| anyhow!("{path}: expected unsigned integer, got {number}")),
        Json::String(text) => text
            .parse()
            .with_context(|| format!("{path}: invalid unsigned integer '{text}'")),
        _ => bail!("{path}: expected unsigned integer"),
    }
}

fn signed(json: &Json, path: &str) -> Result<i128> {
    match json {
        Json::Number(number) => number
            .as_i64()
            .map(i128::from)
            .ok_or_else(|| anyhow!("{path}: expected signed integer, got {number}")),
        Json::String(text) => text
            .parse()
            .with_context(|| format!("{path}: invalid signed integer '{text}'")),
        _ => bail!("{path}: expected signed integer"),
    }
}

/// Converts a value to JSON.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Unit => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::UInt(v) => {
            u64::try_from(*v).map_or_else(|_| Json::String(v.to_string()), Json::from)
        }
        Value::Int(v) => {
            i64::try_from(*v).map_or_else(|_| Json::String(v.to_string()), Json::from)
        }
        Value::F32(v) => Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number),
        Value::F64(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::String(s) => Json::String(s.clone()),
        Value::Bytes(bytes) => Json::Array(bytes.iter().copied().map(Json::from).collect()),
        Value::Option(None) => Json::Null,
        Value::Option(Some(inner)) => match **inner {
            Value::Unit | Value::Option(_) => Json::Array(vec![value_to_json(inner)]),
            _ => value_to_json(inner),
        },
        Value::Seq(items) | Value::Tuple(items) => {
            Json::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(entries) => {
            let string_keys = entries.iter().all(|(k, _)| matches!(k, Value::String(_)));
            if !entries.is_empty() && string_keys {
                let object = entries
                    .iter()
                    .filter_map(|(k, v)| match k {
                        Value::String(k) => Some((k.clone(), value_to_json(v))),
                        _ => None,
                    })
                    .collect::<Map<_, _>>();
                Json::Object(object)
            } else {
                Json::Array(
                    entries
                        .iter()
                        .map(|(k, v)| Json::Array(vec![value_to_json(k), value_to_json(v)]))
                        .collect(),
                )
            }
        }
        Value::Struct(fields) => Json::Object(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Variant { name, value } => {
            let mut object = Map::new();
            object.insert(TAG_KEY.to_owned(), Json::String(name.clone()));
            if let Some(payload) = value {
                object.insert(VALUE_KEY.to_owned(), value_to_json(payload));
            }
            Json::Object(object)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::VariantDef;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::builder()
            .register(TypeDef::structure(
                "Order",
                vec![
                    FieldDef::new("id", ValueType::uint(16)),
                    FieldDef::new("delta", ValueType::int(2)),
                    FieldDef::new("note", ValueType::optional(ValueType::string())),
                    FieldDef::new("tags", ValueType::map(ValueType::string(), ValueType::bool())),
                    FieldDef::new(
                        "lookup",
                        ValueType::map(ValueType::uint(4), ValueType::string()),
                    ),
                    FieldDef::new("window", ValueType::range(ValueType::uint(4))),
                    FieldDef::new("state", ValueType::named("State")),
                ],
            ))
            .register(TypeDef::enumeration(
                "State",
                vec![
                    VariantDef::unit("Open"),
                    VariantDef::tuple("Held", vec![ValueType::string()]),
                    VariantDef::tuple("Moved", vec![ValueType::int(4), ValueType::int(4)]),
                ],
            ))
            .register(TypeDef::structure(
                "Lookup",
                vec![FieldDef::new(
                    "ids",
                    ValueType::map(ValueType::uint(4), ValueType::string()),
                )],
            ))
            .register(TypeDef::structure(
                "Nested",
                vec![
                    FieldDef::new(
                        "maybe",
                        ValueType::optional(ValueType::optional(ValueType::uint(1))),
                    ),
                    FieldDef::new("marker", ValueType::optional(ValueType::unit())),
                ],
            ))
            .build()
            .unwrap()
    }

    fn order_json() -> Json {
        json!({
            "id": "340282366920938463463374607431768211455",
            "delta": -3,
            "note": null,
            "tags": {"rush": true},
            "lookup": [[1, "one"], [2, "two"]],
            "window": {"start": 1, "end": 9},
            "state": {"tag": "Moved", "value": [4, -4]}
        })
    }

    #[test]
    fn json_to_value_follows_schema() {
        let registry = registry();
        let value = json_to_value(&registry, "Order", &order_json()).unwrap();
        assert_eq!(value.field("id"), Some(&Value::UInt(u128::MAX)));
        assert_eq!(value.field("delta"), Some(&Value::Int(-3)));
        assert_eq!(value.field("note"), Some(&Value::none()));
        assert_eq!(
            value.field("lookup"),
            Some(&Value::Map(vec![
                (Value::UInt(1), Value::from("one")),
                (Value::UInt(2), Value::from("two")),
            ]))
        );
        assert_eq!(
            value.field("state"),
            Some(&Value::variant(
                "Moved",
                Value::Tuple(vec![Value::Int(4), Value::Int(-4)])
            ))
        );
        codec::check(&registry, "Order", &value).unwrap();
    }

    #[test]
    fn json_roundtrip_through_bytes() {
        let registry = registry();
        let value = json_to_value(&registry, "Order", &order_json()).unwrap();
        let bytes = codec::encode(&registry, "Order", &value).unwrap();
        let decoded = codec::decode(&registry, "Order", &bytes).unwrap();
        assert_eq!(value_to_json(&decoded), order_json());
    }

    #[test]
    fn unit_variant_json() {
        let registry = registry();
        let mut json = order_json();
        json["state"] = json!({"tag": "Open"});
        let value = json_to_value(&registry, "Order", &json).unwrap();
        assert_eq!(value.field("state"), Some(&Value::unit_variant("Open")));
        assert_eq!(value_to_json(&Value::unit_variant("Open")), json!({"tag": "Open"}));
    }

    #[test]
    fn errors_carry_paths() {
        let registry = registry();
        let mut json = order_json();
        json["state"] = json!({"tag": "Moved", "value": [4, "x"]});
        let err = json_to_value(&registry, "Order", &json).unwrap_err();
        assert!(err.to_string().contains("Order.state::Moved.1"), "{err}");

        let mut json = order_json();
        json["extra"] = json!(1);
        let err = json_to_value(&registry, "Order", &json).unwrap_err();
        assert!(err.to_string().contains("extra"), "{err}");
    }

    #[test]
    fn large_integers_become_strings() {
        assert_eq!(
            value_to_json(&Value::UInt(u128::from(u64::MAX) + 1)),
            json!("18446744073709551616")
        );
        assert_eq!(value_to_json(&Value::Int(-5)), json!(-5));
    }

    #[test]
    fn empty_maps_roundtrip_for_any_key_type() {
        let registry = registry();
        let empty = Value::structure([("ids", Value::Map(Vec::new()))]);
        assert_eq!(value_to_json(&empty), json!({"ids": []}));
        assert_eq!(json_to_value(&registry, "Lookup", &json!({"ids": []})).unwrap(), empty);
        assert_eq!(json_to_value(&registry, "Lookup", &json!({"ids": {}})).unwrap(), empty);

        let bytes = codec::encode(&registry, "Lookup", &empty).unwrap();
        let decoded = codec::decode(&registry, "Lookup", &bytes).unwrap();
        let json = value_to_json(&decoded);
        let again = json_to_value(&registry, "Lookup", &json).unwrap();
        assert_eq!(codec::encode(&registry, "Lookup", &again).unwrap(), bytes);
    }

    #[test]
    fn present_null_options_are_wrapped() {
        let registry = registry();
        let value = Value::structure([
            ("maybe", Value::some(Value::none())),
            ("marker", Value::some(())),
        ]);
        let json = value_to_json(&value);
        assert_eq!(json, json!({"maybe": [null], "marker": [null]}));
        assert_eq!(json_to_value(&registry, "Nested", &json).unwrap(), value);

        let bytes = codec::encode(&registry, "Nested", &value).unwrap();
        assert_eq!(bytes, [1, 0, 1]);
        let decoded = codec::decode(&registry, "Nested", &bytes).unwrap();
        let again = json_to_value(&registry, "Nested", &value_to_json(&decoded)).unwrap();
        assert_eq!(codec::encode(&registry, "Nested", &again).unwrap(), bytes);
    }

    #[test]
    fn nested_options_keep_their_depth() {
        let registry = registry();
        let read = |json: Json| json_to_value(&registry, "Nested", &json).unwrap();
        assert_eq!(
            read(json!({"maybe": null, "marker": null})).field("maybe"),
            Some(&Value::none())
        );
        assert_eq!(
            read(json!({"maybe": [7], "marker": null})).field("maybe"),
            Some(&Value::some(Value::some(7u8)))
        );
        let err = json_to_value(&registry, "Nested", &json!({"maybe": 7, "marker": null}))
            .unwrap_err();
        assert!(err.to_string().contains("Nested.maybe"), "{err}");
    }
}
