//! Type descriptors and the type registry for the compak codec.
//!
//! This crate defines the shapes the codec can encode:
//! - Value types (integers of a width class, floats, text, arrays, maps, ...)
//! - Container types (structs, tuple structs, unit structs, enums)
//! - A validated [`Registry`] resolving type names to definitions
//! - Deterministic schema fingerprinting
//!
//! # Design Principles
//!
//! - **Closed set of types** - The registry is built ahead of time; nothing is inferred.
//! - **Explicit registry** - No global tables; the registry is passed to every call.
//! - **Order is the contract** - Field and variant order define the wire format.

mod def;
mod error;
mod hash;
mod registry;
mod ty;

pub use def::{FieldDef, TypeDef, TypeKind, VariantDef, VariantPayload};
pub use error::{SchemaError, SchemaResult};
pub use hash::schema_fingerprint;
pub use registry::{Registry, RegistryBuilder};
pub use ty::ValueType;
