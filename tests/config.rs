//! Configuration documents loaded from JSON.
#![cfg(feature = "config")]

use std::sync::Arc;

use wiring::{
    ConfigDocument, DiError, Lifetime, Param, ParameterStore, ParameterValue, ServiceCollection, ServiceType,
    TypeCatalog,
};

// ===== Test Services =====

trait Transformer: Send + Sync {
    fn transform(&self, value: &str) -> String;
}

struct Upper;

impl Transformer for Upper {
    fn transform(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

struct Logger;

struct MessageGenerator {
    logger: Arc<Logger>,
    greeting: String,
}

struct Newsletter {
    transformer: Arc<dyn Transformer>,
    recipients: Vec<String>,
}

fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog
        .add("app.Logger", ServiceType::of::<Logger>().construct(|_| Ok(Logger)))
        .add(
            "app.MessageGenerator",
            ServiceType::of::<MessageGenerator>()
                .param(Param::of::<Logger>("logger"))
                .param(Param::new("greeting").with_default("hello"))
                .construct(|args| {
                    Ok(MessageGenerator {
                        logger: args.service("logger")?,
                        greeting: args.string("greeting")?.to_string(),
                    })
                }),
        )
        .add(
            "app.Upper",
            ServiceType::of::<Upper>()
                .implements::<dyn Transformer>(|t| t)
                .construct(|_| Ok(Upper)),
        )
        .add(
            "app.Newsletter",
            ServiceType::of::<Newsletter>()
                .param(Param::of::<dyn Transformer>("transformer"))
                .param(Param::new("recipients"))
                .construct(|args| {
                    let recipients = args
                        .value("recipients")?
                        .as_list()
                        .unwrap_or_default()
                        .iter()
                        .filter_map(|r| r.as_str().map(str::to_string))
                        .collect();
                    Ok(Newsletter {
                        transformer: args.capability("transformer")?,
                        recipients,
                    })
                }),
        );
    catalog
}

// ===== Tests =====

#[test]
fn test_load_full_document() {
    let json = r#"{
        "parameters": {
            "admin_email": "admin@example.com",
            "greeting": "Hi %admin_email%"
        },
        "services": [
            { "id": "logger", "type": "app.Logger" },
            {
                "id": "message_generator",
                "type": "app.MessageGenerator",
                "arguments": { "$greeting": "%greeting%" },
                "autowire": true
            },
            { "id": "upper", "type": "app.Upper", "lifetime": "transient", "tags": ["transformer"] },
            {
                "id": "newsletter",
                "type": "app.Newsletter",
                "arguments": {
                    "0": { "service": "upper" },
                    "1": ["%admin_email%", "ops@example.com"]
                }
            }
        ],
        "aliases": { "generator": "message_generator" }
    }"#;

    let mut services = ServiceCollection::new();
    services.load_json(json, &catalog()).unwrap();
    let container = services.build().unwrap();

    let generator = container.get::<MessageGenerator>("generator").unwrap();
    assert_eq!(generator.greeting, "Hi admin@example.com");
    assert!(Arc::ptr_eq(&generator.logger, &container.get::<Logger>("logger").unwrap()));

    let newsletter = container.get::<Newsletter>("newsletter").unwrap();
    assert_eq!(newsletter.transformer.transform("news"), "NEWS");
    assert_eq!(newsletter.recipients, vec!["admin@example.com", "ops@example.com"]);

    let descriptors = container.list_all();
    assert_eq!(descriptors[2].lifetime, Lifetime::Transient);
    assert_eq!(descriptors[2].tags, vec!["transformer"]);
    assert_eq!(container.tagged("transformer"), vec!["upper"]);
}

#[test]
fn test_unknown_type_names_the_service() {
    let json = r#"{ "services": [ { "id": "db", "type": "app.Database" } ] }"#;
    let mut services = ServiceCollection::new();

    match services.load_json(json, &catalog()) {
        Err(DiError::UnknownType { service, type_name }) => {
            assert_eq!(service, "db");
            assert_eq!(type_name, "app.Database");
        }
        Err(other) => panic!("expected UnknownType, got {}", other),
        Ok(_) => panic!("expected UnknownType"),
    }
}

#[test]
fn test_duplicate_ids_in_a_document() {
    let json = r#"{
        "services": [
            { "id": "logger", "type": "app.Logger" },
            { "id": "logger", "type": "app.Logger" }
        ]
    }"#;
    let mut services = ServiceCollection::new();
    assert!(matches!(
        services.load_json(json, &catalog()),
        Err(DiError::DuplicateId(id)) if id == "logger"
    ));
}

#[test]
fn test_malformed_documents_are_invalid_config() {
    let mut services = ServiceCollection::new();
    assert!(matches!(
        services.load_json("{ not json", &catalog()),
        Err(DiError::InvalidConfig(_))
    ));
    assert!(matches!(
        services.load_json(r#"{ "services": [ { "id": "x" } ] }"#, &catalog()),
        Err(DiError::InvalidConfig(_))
    ));
    assert!(matches!(
        services.load_json(r#"{ "services": [ { "id": "x", "type": "app.Logger", "lifetime": "scoped" } ] }"#, &catalog()),
        Err(DiError::InvalidConfig(_))
    ));
}

#[test]
fn test_unknown_argument_keys_surface_at_resolution() {
    let json = r#"{
        "services": [
            { "id": "logger", "type": "app.Logger", "arguments": { "$level": "debug" } }
        ]
    }"#;
    let mut services = ServiceCollection::new();
    services.load_json(json, &catalog()).unwrap();
    let container = services.build().unwrap();

    assert!(matches!(
        container.get_any("logger"),
        Err(DiError::UnknownArgument { argument, .. }) if argument.contains("level")
    ));
}

#[test]
fn test_document_round_trips_through_serde() {
    let document = ConfigDocument::from_json(
        r#"{ "parameters": { "port": 25 }, "aliases": { "log": "logger" } }"#,
    )
    .unwrap();
    assert_eq!(document.parameters["port"], ParameterValue::Int(25));

    let json = serde_json::to_string(&document).unwrap();
    assert_eq!(ConfigDocument::from_json(&json).unwrap(), document);
}

#[test]
fn test_parameter_store_from_json() {
    let store = ParameterStore::from_json(
        r#"{ "host": "localhost", "dsn": "smtp://%host%:%port%", "port": 25, "debug": false }"#,
    )
    .unwrap();
    assert!(!store.is_resolved());

    let resolved = store.resolve_all().unwrap();
    assert_eq!(resolved.get("dsn").unwrap(), &ParameterValue::from("smtp://localhost:25"));
    assert_eq!(resolved.get("debug").unwrap(), &ParameterValue::Bool(false));

    assert!(matches!(ParameterStore::from_json("[1, 2]"), Err(DiError::InvalidConfig(_))));
}
