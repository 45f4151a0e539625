#![no_main]

use libfuzzer_sys::fuzz_target;
use wiring::{ServiceCollection, ServiceType, TypeCatalog};

struct Clock;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let mut catalog = TypeCatalog::new();
    catalog.add("app.Clock", ServiceType::of::<Clock>().construct(|_| Ok(Clock)));

    let mut services = ServiceCollection::new();
    if services.load_json(json, &catalog).is_err() {
        return;
    }
    let Ok(container) = services.build() else {
        return;
    };

    // Whatever was loaded, validation and resolution report errors instead
    // of panicking
    let report = container.validate();
    for descriptor in container.list_all() {
        let result = container.get_any(descriptor.id.as_str());
        if report.is_valid() {
            assert!(result.is_ok());
        }
    }
});
