#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = dynvalue::Value::from_json(data);
    let _ = dynvalue::List::from_json(data);
    let _ = dynvalue::Dict::from_json(data);
});
