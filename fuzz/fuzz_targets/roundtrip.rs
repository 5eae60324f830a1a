#![no_main]
use dynvalue::{EncodeOptions, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoded values never hold non-finite floats, so they must survive a round trip
    if let Ok(value) = Value::from_json(data) {
        for options in [EncodeOptions::new(), EncodeOptions::new().indent("  ")] {
            let encoded = value.to_json_with(&options).expect("Decoded values are encodable");
            let decoded = Value::from_json(&encoded).expect("Encoded output is valid JSON");
            assert_eq!(decoded, value);
        }
        let rebuilt = Value::from_generic(value.to_generic()).expect("Extracted trees are valid");
        assert_eq!(rebuilt, value);
    }
});
