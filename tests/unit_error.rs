/// Unit tests for DiError and DiResult types
/// These tests pin the messages users read when configuration is wrong
use std::error::Error;
use wiring::{DiError, DiResult, ServiceId};

fn ids(raw: &[&str]) -> Vec<ServiceId> {
    raw.iter().map(|id| ServiceId::from(*id)).collect()
}

#[test]
fn test_error_display_unknown_service() {
    let error = DiError::UnknownService {
        id: "mailer".into(),
        required_by: None,
    };
    assert_eq!(error.to_string(), "Service not found: \"mailer\"");

    let error = DiError::UnknownService {
        id: "transport".into(),
        required_by: Some("mailer".into()),
    };
    assert_eq!(
        error.to_string(),
        "Service not found: \"transport\" (referenced by \"mailer\")"
    );
}

#[test]
fn test_error_display_unknown_parameter() {
    let error = DiError::UnknownParameter {
        name: "admin_email".to_string(),
    };
    assert_eq!(error.to_string(), "Parameter not found: \"admin_email\"");
}

#[test]
fn test_error_display_malformed_placeholder() {
    let error = DiError::MalformedPlaceholder {
        value: "50% off".to_string(),
        position: 2,
        reason: "whitespace inside a placeholder name",
    };
    assert_eq!(
        error.to_string(),
        "Malformed placeholder in \"50% off\" at byte 2: whitespace inside a placeholder name"
    );
}

#[test]
fn test_error_display_duplicate_id() {
    let error = DiError::DuplicateId("logger".into());
    assert_eq!(error.to_string(), "Service \"logger\" is already registered");
}

#[test]
fn test_error_display_autowiring() {
    let error = DiError::NoCandidate {
        service: "twitter_client".into(),
        parameter: "transformer".to_string(),
        capability: "dyn app::Transformer",
    };
    let display = error.to_string();
    assert!(display.contains("\"transformer\""));
    assert!(display.contains("\"twitter_client\""));
    assert!(display.contains("no registered service implements dyn app::Transformer"));

    let error = DiError::AmbiguousCandidate {
        service: "twitter_client".into(),
        parameter: "transformer".to_string(),
        capability: "dyn app::Transformer",
        candidates: ids(&["upper", "rot13"]),
    };
    let display = error.to_string();
    assert!(display.contains("dyn app::Transformer is implemented by upper, rot13"));
    assert!(display.contains("configure the argument explicitly"));
}

#[test]
fn test_error_display_missing_argument() {
    let error = DiError::MissingArgument {
        service: "site_update_manager".into(),
        parameter: "admin_email".to_string(),
    };
    let display = error.to_string();
    assert!(display.starts_with("Cannot resolve argument \"admin_email\" of service \"site_update_manager\""));
    assert!(display.contains("configure its value explicitly"));
}

#[test]
fn test_error_display_circular() {
    let error = DiError::CircularDependency(ids(&["a", "b", "c", "a"]));
    assert_eq!(error.to_string(), "Circular dependency: a -> b -> c -> a");

    let error = DiError::CircularParameter(vec!["x".to_string(), "y".to_string(), "x".to_string()]);
    assert_eq!(error.to_string(), "Circular parameter reference: x -> y -> x");

    let error = DiError::DepthExceeded(128);
    assert_eq!(error.to_string(), "Maximum resolution depth (128) exceeded");
}

#[test]
fn test_error_display_non_scalar_interpolation() {
    let error = DiError::NonScalarInterpolation {
        name: "hosts".to_string(),
        kind: "list",
        value: "hosts: %hosts%".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Parameter \"hosts\" holds a list and cannot be embedded in \"hosts: %hosts%\""
    );
}

#[test]
fn test_error_display_remaining_variants() {
    let error = DiError::UnknownArgument {
        service: "mailer".into(),
        argument: "$sender".to_string(),
    };
    assert_eq!(error.to_string(), "Service \"mailer\" has no constructor argument $sender");

    let error = DiError::TypeMismatch {
        subject: "service \"clock\"".to_string(),
        expected: "alloc::string::String",
    };
    assert_eq!(error.to_string(), "service \"clock\" is not a alloc::string::String");

    let error = DiError::Construction {
        service: "db".into(),
        message: "connection refused".to_string(),
    };
    assert_eq!(error.to_string(), "Failed to construct service \"db\": connection refused");

    let error = DiError::UnknownType {
        service: "db".into(),
        type_name: "app.Database".to_string(),
    };
    assert_eq!(error.to_string(), "Service \"db\" names unknown type \"app.Database\"");

    let error = DiError::InvalidConfig("expected value at line 1".to_string());
    assert_eq!(error.to_string(), "Invalid configuration: expected value at line 1");
}

#[test]
fn test_error_is_std_error_without_source() {
    let error = DiError::DuplicateId("logger".into());
    assert!(error.source().is_none());

    let boxed: Box<dyn Error + Send + Sync> = Box::new(error);
    assert!(boxed.to_string().contains("logger"));
}

#[test]
fn test_di_result_propagates_with_question_mark() {
    fn inner() -> DiResult<u32> {
        Err(DiError::UnknownParameter { name: "port".to_string() })
    }
    fn outer() -> DiResult<u32> {
        let port = inner()?;
        Ok(port + 1)
    }

    assert!(matches!(outer(), Err(DiError::UnknownParameter { name }) if name == "port"));
}

#[test]
fn test_error_clone_preserves_details() {
    let error = DiError::CircularDependency(ids(&["a", "a"]));
    let cloned = error.clone();
    assert_eq!(error.to_string(), cloned.to_string());
}
