//! Service descriptors for introspection and diagnostics.

use crate::definition::ServiceDefinition;
use crate::key::ServiceId;
use crate::lifetime::Lifetime;

/// Service descriptor for introspection and diagnostics
///
/// A read-only summary of one registered definition, produced without
/// constructing anything.
///
/// # Use Cases
///
/// - **Debugging**: list what is registered, under which ids and aliases
/// - **Documentation**: dump the container's configuration
/// - **Health checks**: assert at startup that expected services exist
///
/// # Examples
///
/// ```rust
/// use wiring::{Lifetime, ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct Logger;
/// struct RequestId;
///
/// let mut services = ServiceCollection::new();
/// services
///     .register(ServiceDefinition::new("logger", ServiceType::of::<Logger>().construct(|_| Ok(Logger))))
///     .unwrap()
///     .register(
///         ServiceDefinition::new("request_id", ServiceType::of::<RequestId>().construct(|_| Ok(RequestId)))
///             .with_lifetime(Lifetime::Transient)
///             .tag("per_request"),
///     )
///     .unwrap()
///     .alias("log", "logger")
///     .unwrap();
///
/// let container = services.build().unwrap();
/// let descriptors = container.list_all();
///
/// assert_eq!(descriptors.len(), 2);
/// assert_eq!(descriptors[0].id, "logger");
/// assert!(descriptors[0].type_name.ends_with("Logger"));
/// assert_eq!(descriptors[0].aliases, vec!["log"]);
/// assert_eq!(descriptors[1].lifetime, Lifetime::Transient);
/// assert!(descriptors[1].has_tag("per_request"));
///
/// // Listing never constructs
/// assert!(!container.is_initialized("logger"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    /// Service identifier
    pub id: ServiceId,
    /// Name of the constructed type, as produced by `std::any::type_name`
    pub type_name: &'static str,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Whether unconfigured arguments are autowired
    pub autowire: bool,
    /// Tags in declaration order
    pub tags: Vec<String>,
    /// Aliases pointing directly at this service
    pub aliases: Vec<ServiceId>,
    /// Whether cached instances are disposed with their scope
    pub disposable: bool,
}

impl ServiceDescriptor {
    pub(crate) fn describe(definition: &ServiceDefinition, aliases: &[(ServiceId, ServiceId)]) -> Self {
        ServiceDescriptor {
            id: definition.id().clone(),
            type_name: definition.service_type().name(),
            lifetime: definition.lifetime(),
            autowire: definition.is_autowired(),
            tags: definition.tags().to_vec(),
            aliases: aliases
                .iter()
                .filter(|(_, target)| target == definition.id())
                .map(|(alias, _)| alias.clone())
                .collect(),
            disposable: definition.service_type().is_disposable(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the service has any alias.
    pub fn is_aliased(&self) -> bool {
        !self.aliases.is_empty()
    }
}

impl std::fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {:?})", self.id, self.type_name, self.lifetime)?;
        if !self.aliases.is_empty() {
            let aliases: Vec<&str> = self.aliases.iter().map(ServiceId::as_str).collect();
            write!(f, " aliases: {}", aliases.join(", "))?;
        }
        Ok(())
    }
}
