#![no_main]

use libfuzzer_sys::fuzz_target;
use wiring::{Argument, Param, ServiceCollection, ServiceDefinition, ServiceType};

struct Node;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 64 {
        return;
    }

    // Byte i names the dependency of service i, forming an arbitrary graph
    let count = data.len();
    let mut services = ServiceCollection::new();
    for (i, byte) in data.iter().enumerate() {
        let node = ServiceType::of::<Node>().param(Param::new("next")).construct(|_| Ok(Node));
        let target = usize::from(*byte);
        let definition = if target < count {
            ServiceDefinition::new(format!("s{}", i), node).arg("next", Argument::service(format!("s{}", target)))
        } else {
            ServiceDefinition::new(format!("s{}", i), node).arg("next", "leaf")
        };
        if services.register(definition).is_err() {
            return;
        }
    }
    let container = services.build().expect("no parameters to resolve");

    // Validation finds a cycle exactly when some lookup hits one
    let report = container.validate();
    let mut resolved_all = true;
    for i in 0..count {
        if container.get_any(&format!("s{}", i)).is_err() {
            resolved_all = false;
        }
    }
    assert_eq!(report.is_valid(), resolved_all);
});
