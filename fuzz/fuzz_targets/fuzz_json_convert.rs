#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(map) = fattura::field_map_from_json(value) {
            // Errors are fine, panics are not
            let _ = fattura::convert(&map);
        }
    }
});
