//! Schema-directed encoding and decoding for the compak binary format.
//!
//! This is the main codec crate that ties together bytestream and schema to
//! turn dynamic [`Value`]s into bytes and back, driven by a [`Registry`].
//!
//! # Features
//!
//! - Structs, tuple structs, unit structs and enums from the registry
//! - Integers of every width class, floats, text, byte arrays
//! - Optionals, arrays (dynamic and fixed), maps, tuples and ranges
//! - Shape checking with value paths before any byte is written
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **Explicit registry** - Type names resolve through the registry passed in.
//! - **Deterministic** - Same inputs produce same outputs.
//! - **No partial results** - Every failure aborts the call.
//!
//! # Example
//!
//! ```
//! use codec::{decode, encode, Value};
//! use schema::{FieldDef, Registry, TypeDef, ValueType};
//!
//! let registry = Registry::builder()
//!     .register(TypeDef::structure(
//!         "Greeting",
//!         vec![
//!             FieldDef::new("text", ValueType::string()),
//!             FieldDef::new("count", ValueType::uint(2)),
//!         ],
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let value = Value::structure([("text", Value::from("Hi")), ("count", Value::from(300u16))]);
//! let bytes = encode(&registry, "Greeting", &value).unwrap();
//! assert_eq!(bytes, [2, b'H', b'i', 0xAC, 0x02]);
//! assert_eq!(decode(&registry, "Greeting", &bytes).unwrap(), value);
//! ```

mod check;
mod config;
mod decode;
mod encode;
mod error;
mod limits;
mod path;
mod value;

use bytestream::{ByteReader, ByteWriter};
use log::debug;
use schema::{Registry, TypeDef};

use crate::check::Checker;
use crate::decode::Decoder;
use crate::encode::Encoder;

pub use config::{CodecConfig, MapOrder, TrailingBytes};
pub use error::{CodecError, CodecResult, LimitKind, ShapeReason};
pub use limits::CodecLimits;
pub use value::Value;

/// Encodes and decodes values of the types in a registry.
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r Registry,
    config: CodecConfig,
}

impl<'r> Codec<'r> {
    /// Creates a codec with the default configuration.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    #[must_use]
    pub const fn with_config(registry: &'r Registry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r Registry {
        self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn resolve(&self, type_name: &str) -> CodecResult<&'r TypeDef> {
        self.registry
            .get(type_name)
            .ok_or_else(|| CodecError::UnknownType {
                name: type_name.to_owned(),
            })
    }

    /// Checks that `value` has the shape of `type_name` without encoding it.
    pub fn check(&self, type_name: &str, value: &Value) -> CodecResult<()> {
        let def = self.resolve(type_name)?;
        Checker::new(self.registry, &self.config.limits, type_name).check(def, value)
    }

    /// Encodes `value` as `type_name`.
    pub fn encode(&self, type_name: &str, value: &Value) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(type_name, value, &mut out)?;
        Ok(out)
    }

    /// Encodes `value` as `type_name`, appending to `out`.
    ///
    /// `out` is left untouched on failure.
    pub fn encode_into(
        &self,
        type_name: &str,
        value: &Value,
        out: &mut Vec<u8>,
    ) -> CodecResult<()> {
        let def = self.resolve(type_name)?;
        Checker::new(self.registry, &self.config.limits, type_name).check(def, value)?;

        let mut writer = ByteWriter::new();
        Encoder::new(self.registry, &self.config, type_name).encode_def(&mut writer, def, value)?;
        debug!("encoded {type_name}: {} bytes", writer.bytes_written());
        writer.finish_into(out);
        Ok(())
    }

    /// Decodes one value of `type_name` from `bytes`.
    pub fn decode(&self, type_name: &str, bytes: &[u8]) -> CodecResult<Value> {
        let def = self.resolve(type_name)?;
        let limits = &self.config.limits;
        if bytes.len() > limits.max_input_bytes {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::InputBytes,
                limit: limits.max_input_bytes,
                actual: bytes.len(),
            });
        }

        let mut reader = ByteReader::new(bytes);
        let result = Decoder::new(self.registry, limits)
            .decode(&mut reader, def)
            .and_then(|value| match self.config.trailing_bytes {
                TrailingBytes::Reject if !reader.is_empty() => Err(CodecError::TrailingBytes {
                    remaining: reader.remaining(),
                }),
                _ => Ok(value),
            });
        match &result {
            Ok(_) => debug!("decoded {type_name}: {} of {} bytes", reader.position(), bytes.len()),
            Err(err) => debug!("decode of {type_name} failed at byte {}: {err}", reader.position()),
        }
        result
    }
}

/// Encodes `value` as `type_name` with the default configuration.
pub fn encode(registry: &Registry, type_name: &str, value: &Value) -> CodecResult<Vec<u8>> {
    Codec::new(registry).encode(type_name, value)
}

/// Decodes one value of `type_name` with the default configuration.
pub fn decode(registry: &Registry, type_name: &str, bytes: &[u8]) -> CodecResult<Value> {
    Codec::new(registry).decode(type_name, bytes)
}

/// Checks `value` against `type_name` with the default configuration.
pub fn check(registry: &Registry, type_name: &str, value: &Value) -> CodecResult<()> {
    Codec::new(registry).check(type_name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{FieldDef, ValueType};

    fn registry() -> Registry {
        Registry::builder()
            .register(TypeDef::structure(
                "Small",
                vec![FieldDef::new("field", ValueType::uint(1))],
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn unknown_type_name() {
        let registry = registry();
        let err = encode(&registry, "Missing", &Value::Unit).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownType {
                name: "Missing".into()
            }
        );
        assert!(decode(&registry, "Missing", &[]).is_err());
    }

    #[test]
    fn encode_into_appends_and_keeps_output_on_failure() {
        let registry = registry();
        let codec = Codec::new(&registry);
        let mut out = vec![0xEE];
        codec
            .encode_into("Small", &Value::structure([("field", Value::from(5u8))]), &mut out)
            .unwrap();
        assert_eq!(out, [0xEE, 5]);

        let bad = Value::structure([("field", Value::from("five"))]);
        assert!(codec.encode_into("Small", &bad, &mut out).is_err());
        assert_eq!(out, [0xEE, 5]);
    }

    #[test]
    fn trailing_bytes_policy() {
        let registry = registry();
        assert_eq!(
            decode(&registry, "Small", &[5, 6]).unwrap_err(),
            CodecError::TrailingBytes { remaining: 1 }
        );

        let config = CodecConfig::default().with_trailing_bytes(TrailingBytes::Allow);
        let codec = Codec::with_config(&registry, config);
        assert_eq!(
            codec.decode("Small", &[5, 6]).unwrap(),
            Value::structure([("field", Value::from(5u8))])
        );
    }

    #[test]
    fn input_size_limit() {
        let registry = registry();
        let config = CodecConfig::for_testing();
        let limit = config.limits.max_input_bytes;
        let codec = Codec::with_config(&registry, config);
        let err = codec.decode("Small", &vec![0; limit + 1]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitsExceeded {
                kind: LimitKind::InputBytes,
                ..
            }
        ));
    }
}
