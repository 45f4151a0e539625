/// Property-based tests for interpolation and resolution
///
/// These tests verify that escaping, singleton identity and dependency chains
/// behave the same regardless of the specific ids or values used.
use proptest::prelude::*;
use std::sync::Arc;
use wiring::{Argument, Param, ParameterStore, ParameterValue, ServiceCollection, ServiceDefinition, ServiceType};

#[derive(Debug)]
struct Link {
    next: Option<Arc<Link>>,
}

fn link() -> ServiceType {
    ServiceType::of::<Link>()
        .param(Param::of::<Link>("next").with_default(ParameterValue::Null))
        .construct(|args| {
            let next = match args.value("next") {
                Ok(_) => None,
                Err(_) => Some(args.service::<Link>("next")?),
            };
            Ok(Link { next })
        })
}

// Property: escaping any text and interpolating it yields the text unchanged
proptest! {
    #[test]
    fn escape_round_trip(literal in "\\PC{0,40}") {
        let store = ParameterStore::new();
        let escaped = ParameterStore::escape(&literal);
        prop_assert_eq!(store.resolve(&escaped).unwrap(), ParameterValue::String(literal));
    }
}

// Property: text without delimiters is never looked up
proptest! {
    #[test]
    fn text_without_delimiters_is_unchanged(text in "[^%]{0,40}") {
        let store = ParameterStore::new();
        prop_assert_eq!(store.resolve(&text).unwrap(), ParameterValue::String(text));
    }
}

// Property: a whole-string placeholder returns the parameter unchanged
proptest! {
    #[test]
    fn whole_placeholder_preserves_integers(name in "[a-z][a-z0-9_.]{0,15}", value in any::<i64>()) {
        let mut store = ParameterStore::new();
        store.set(name.clone(), value);
        prop_assert_eq!(store.resolve(&format!("%{}%", name)).unwrap(), ParameterValue::Int(value));
    }
}

// Property: every lookup of a singleton returns the same instance
proptest! {
    #[test]
    fn singleton_resolution_consistency(id in "[a-z][a-z0-9_.]{0,20}", lookups in 1usize..10) {
        let mut services = ServiceCollection::new();
        services.register(ServiceDefinition::new(id.as_str(), link())).unwrap();
        let container = services.build().unwrap();

        let first = container.get::<Link>(&id).unwrap();
        for _ in 0..lookups {
            let again = container.get::<Link>(&id).unwrap();
            prop_assert!(Arc::ptr_eq(&first, &again));
        }
        prop_assert!(first.next.is_none());
    }
}

// Property: a chain of explicit references builds every link exactly once
proptest! {
    #[test]
    fn chains_resolve_in_any_length(length in 1usize..12) {
        let mut services = ServiceCollection::new();
        for i in 0..length {
            let mut definition = ServiceDefinition::new(format!("link.{}", i), link());
            if i + 1 < length {
                definition = definition.arg("next", Argument::service(format!("link.{}", i + 1)));
            }
            services.register(definition).unwrap();
        }
        let container = services.build().unwrap();

        let mut current = container.get::<Link>("link.0").unwrap();
        let mut seen = 1;
        while let Some(next) = current.next.clone() {
            current = next;
            seen += 1;
        }
        prop_assert_eq!(seen, length);

        let tail = container.get::<Link>(&format!("link.{}", length - 1)).unwrap();
        prop_assert!(Arc::ptr_eq(&current, &tail));

        let descriptors = container.list_all();
        let ids: Vec<_> = descriptors.iter().map(|d| d.id.to_string()).collect();
        let expected: Vec<_> = (0..length).map(|i| format!("link.{}", i)).collect();
        prop_assert_eq!(ids, expected);
    }
}
