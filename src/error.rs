//! Error types for the service container.

use crate::key::ServiceId;

/// Service container errors
///
/// Every failure of registration, parameter interpolation or resolution is
/// reported through this enum. Errors are never recovered from internally:
/// they propagate to the caller of the outermost `get`, and each variant
/// carries the identifiers, parameter names, candidate lists or cycle paths
/// needed to fix the configuration without re-reading it.
///
/// # Examples
///
/// ```rust
/// use wiring::{DiError, ServiceCollection};
///
/// let container = ServiceCollection::new().build().unwrap();
/// match container.get_any("mailer") {
///     Err(DiError::UnknownService { id, .. }) => assert_eq!(id, "mailer"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use wiring::{DiError, ServiceId};
///
/// let cycle = DiError::CircularDependency(vec![
///     ServiceId::from("a"),
///     ServiceId::from("b"),
///     ServiceId::from("a"),
/// ]);
/// assert_eq!(cycle.to_string(), "Circular dependency: a -> b -> a");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// Requested or referenced identifier is not registered
    #[error("Service not found: \"{id}\"{}", required_by_suffix(.required_by))]
    UnknownService {
        id: ServiceId,
        /// The service whose configuration referenced `id`, if any
        required_by: Option<ServiceId>,
    },

    /// Placeholder or direct lookup names an undefined parameter
    #[error("Parameter not found: \"{name}\"")]
    UnknownParameter { name: String },

    /// Unbalanced or invalid placeholder syntax in a configured value
    #[error("Malformed placeholder in \"{value}\" at byte {position}: {reason}")]
    MalformedPlaceholder {
        value: String,
        position: usize,
        reason: &'static str,
    },

    /// An identifier (service or alias) was registered twice
    #[error("Service \"{0}\" is already registered")]
    DuplicateId(ServiceId),

    /// Autowiring found no service satisfying a parameter's capability
    #[error(
        "Cannot autowire argument \"{parameter}\" of service \"{service}\": \
         no registered service implements {capability}"
    )]
    NoCandidate {
        service: ServiceId,
        parameter: String,
        capability: &'static str,
    },

    /// Autowiring found several services satisfying a parameter's capability
    #[error(
        "Cannot autowire argument \"{parameter}\" of service \"{service}\": \
         {capability} is implemented by {}; configure the argument explicitly \
         or alias the capability to one of them",
        join_ids(.candidates, ", ")
    )]
    AmbiguousCandidate {
        service: ServiceId,
        parameter: String,
        capability: &'static str,
        candidates: Vec<ServiceId>,
    },

    /// A constructor parameter has no explicit value and cannot be autowired
    #[error(
        "Cannot resolve argument \"{parameter}\" of service \"{service}\": \
         it has no explicit value and cannot be autowired; configure its value explicitly"
    )]
    MissingArgument { service: ServiceId, parameter: String },

    /// A resolution path revisited an identifier that is still being built
    #[error("Circular dependency: {}", join_ids(.0, " -> "))]
    CircularDependency(Vec<ServiceId>),

    /// A resolution chain nested deeper than the resolver allows
    #[error("Maximum resolution depth ({0}) exceeded")]
    DepthExceeded(usize),

    /// Parameters reference each other in a loop
    #[error("Circular parameter reference: {}", .0.join(" -> "))]
    CircularParameter(Vec<String>),

    /// A list or map parameter was embedded inside a longer string
    #[error("Parameter \"{name}\" holds a {kind} and cannot be embedded in \"{value}\"")]
    NonScalarInterpolation {
        name: String,
        kind: &'static str,
        value: String,
    },

    /// An explicit argument targets a parameter the constructor does not declare
    #[error("Service \"{service}\" has no constructor argument {argument}")]
    UnknownArgument { service: ServiceId, argument: String },

    /// A value or instance does not have the type it was requested as
    #[error("{subject} is not a {expected}")]
    TypeMismatch {
        subject: String,
        expected: &'static str,
    },

    /// A constructor reported a failure of its own
    #[error("Failed to construct service \"{service}\": {message}")]
    Construction { service: ServiceId, message: String },

    /// A definition record names a type the catalog does not know
    #[error("Service \"{service}\" names unknown type \"{type_name}\"")]
    UnknownType { service: ServiceId, type_name: String },

    /// A configuration document could not be read
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DiError {
    /// Attaches the referencing service to an `UnknownService` error that
    /// does not name one yet. Other errors are returned unchanged.
    pub(crate) fn required_by(self, service: &ServiceId) -> Self {
        match self {
            DiError::UnknownService { id, required_by: None } => DiError::UnknownService {
                id,
                required_by: Some(service.clone()),
            },
            other => other,
        }
    }
}

fn required_by_suffix(required_by: &Option<ServiceId>) -> String {
    match required_by {
        Some(service) => format!(" (referenced by \"{}\")", service),
        None => String::new(),
    }
}

fn join_ids(ids: &[ServiceId], separator: &str) -> String {
    ids.iter()
        .map(ServiceId::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Result type for container operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use wiring::{DiError, DiResult};
///
/// fn lookup_port() -> DiResult<i64> {
///     Err(DiError::UnknownParameter { name: "port".to_string() })
/// }
///
/// assert!(lookup_port().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
