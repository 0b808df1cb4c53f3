//! Command-line helpers for the compak codec.
//!
//! - Convert JSON documents to codec values and back, guided by a registry
//! - Render decoded values as an indented tree
//! - Summarize a registry with variant ordinals and its fingerprint
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the bytes hold.

mod json;
mod report;

pub use json::{json_to_value, value_to_json, TAG_KEY, VALUE_KEY};
pub use report::{
    describe_type, format_pretty, format_schema_report, schema_report, SchemaReport, TypeSummary,
};

/// Renders bytes as lowercase hex pairs separated by spaces.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_output() {
        assert_eq!(format_hex(&[0x02, 0x48, 0xAC]), "02 48 ac");
        assert_eq!(format_hex(&[]), "");
    }
}
