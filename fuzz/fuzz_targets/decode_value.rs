#![no_main]

use codec::{Codec, CodecConfig, TrailingBytes};
use libfuzzer_sys::fuzz_target;
use schema::{FieldDef, Registry, TypeDef, ValueType, VariantDef};

fn registry() -> Registry {
    Registry::builder()
        .register(TypeDef::structure(
            "Record",
            vec![
                FieldDef::new("id", ValueType::uint(8)),
                FieldDef::new("delta", ValueType::int(2)),
                FieldDef::new("name", ValueType::string()),
                FieldDef::new("blob", ValueType::bytes()),
                FieldDef::new("scores", ValueType::array(ValueType::float(4))),
                FieldDef::new(
                    "pair",
                    ValueType::tuple(vec![ValueType::bool(), ValueType::uint(1)]),
                ),
                FieldDef::new("index", ValueType::map(ValueType::string(), ValueType::int(16))),
                FieldDef::new("window", ValueType::range(ValueType::uint(4))),
                FieldDef::new("next", ValueType::optional(ValueType::named("Node"))),
            ],
        ))
        .register(TypeDef::enumeration(
            "Node",
            vec![
                VariantDef::unit("Leaf"),
                VariantDef::tuple("Chain", vec![ValueType::named("Record")]),
                VariantDef::structure(
                    "Pad",
                    vec![FieldDef::new(
                        "units",
                        ValueType::fixed_array(ValueType::unit(), 4),
                    )],
                ),
            ],
        ))
        .build()
        .expect("fuzz registry is valid")
}

fuzz_target!(|data: &[u8]| {
    let registry = registry();
    let config = CodecConfig::for_testing().with_trailing_bytes(TrailingBytes::Allow);
    let codec = Codec::with_config(&registry, config);

    // Anything that decodes must re-encode, and the re-encoding is a fixed point.
    if let Ok(value) = codec.decode("Record", data) {
        let bytes = codec.encode("Record", &value).expect("decoded value re-encodes");
        let again = codec.decode("Record", &bytes).expect("re-encoded bytes decode");
        assert_eq!(codec.encode("Record", &again).expect("second encode"), bytes);
    }
    let _ = codec.decode("Node", data);
});
