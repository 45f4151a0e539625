//! Named service types for configuration-driven registration.

use crate::error::{DiError, DiResult};
use crate::key::ServiceId;
use crate::service_type::ServiceType;

/// Lookup table from type name to [`ServiceType`].
///
/// Configuration records name the type to construct as a string; the catalog
/// maps those names to the service types the application compiled in. It can
/// also register every type it holds at once, each under its own name, for
/// applications that wire everything by type.
///
/// # Examples
///
/// ```rust
/// use wiring::{ServiceCollection, ServiceType, TypeCatalog};
///
/// struct Clock;
/// struct Mailer;
///
/// let mut catalog = TypeCatalog::new();
/// catalog
///     .add("app.clock", ServiceType::of::<Clock>().construct(|_| Ok(Clock)))
///     .add("app.mailer", ServiceType::of::<Mailer>().construct(|_| Ok(Mailer)));
///
/// assert!(catalog.get("app.clock").is_some());
/// assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["app.clock", "app.mailer"]);
///
/// let mut services = ServiceCollection::new();
/// services.register_catalog(&catalog, true).unwrap();
/// let container = services.build().unwrap();
/// assert!(container.get::<Mailer>("app.mailer").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    entries: Vec<(String, ServiceType)>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `service_type` under `name`, replacing an earlier entry of that
    /// name.
    pub fn add(&mut self, name: impl Into<String>, service_type: ServiceType) -> &mut Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = service_type,
            None => self.entries.push((name, service_type)),
        }
        self
    }

    /// Adds `service_type` under its full Rust type name.
    pub fn add_type(&mut self, service_type: ServiceType) -> &mut Self {
        let name = service_type.name();
        self.add(name, service_type)
    }

    pub fn get(&self, name: &str) -> Option<&ServiceType> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, service_type)| service_type)
    }

    /// Like [`get`](Self::get), failing with `UnknownType` on behalf of
    /// `service`.
    pub fn resolve(&self, service: &ServiceId, name: &str) -> DiResult<&ServiceType> {
        self.get(name).ok_or_else(|| DiError::UnknownType {
            service: service.clone(),
            type_name: name.to_string(),
        })
    }

    /// Type names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceType)> {
        self.entries
            .iter()
            .map(|(name, service_type)| (name.as_str(), service_type))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
