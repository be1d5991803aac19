#![no_main]

use libfuzzer_sys::fuzz_target;
use protoscan::{analyze, DetectConfig};

// Arbitrary JSON must never panic. Malformed trees (e.g. `arguments` that is
// not an array) may still come back as errors.
fuzz_target!(|data: &[u8]| {
    let Ok(tree) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let _ = analyze(&tree, &DetectConfig::default());
});
