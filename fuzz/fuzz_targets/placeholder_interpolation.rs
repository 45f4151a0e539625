#![no_main]

use libfuzzer_sys::fuzz_target;
use wiring::{ParameterStore, ParameterValue};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let mut params = ParameterStore::new();
    params.set("host", "localhost");
    params.set("port", 25);
    params.set("hosts", vec!["a", "b"]);
    params.set("loop", "%loop%");

    // Any input either interpolates or fails with an error, never panics
    let _ = params.resolve(raw);

    // Escaped text always reads back unchanged
    let escaped = ParameterStore::escape(raw);
    assert_eq!(
        params.resolve(&escaped).ok(),
        Some(ParameterValue::String(raw.to_string()))
    );
});
