//! Service lifetime definitions.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use wiring::{Lifetime, ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct Clock;
/// struct RequestId;
///
/// let mut services = ServiceCollection::new();
/// services
///     .register(ServiceDefinition::new("clock", ServiceType::of::<Clock>().construct(|_| Ok(Clock))))
///     .unwrap()
///     .register(
///         ServiceDefinition::new("request_id", ServiceType::of::<RequestId>().construct(|_| Ok(RequestId)))
///             .with_lifetime(Lifetime::Transient),
///     )
///     .unwrap();
///
/// let container = services.build().unwrap();
///
/// // Singleton: same instance on every lookup
/// let a = container.get::<Clock>("clock").unwrap();
/// let b = container.get::<Clock>("clock").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Transient: fresh instance on every lookup
/// let a = container.get::<RequestId>("request_id").unwrap();
/// let b = container.get::<RequestId>("request_id").unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// At most one instance per scope, built on first request
    ///
    /// The instance is cached by the scope that built it and handed to every
    /// caller and every dependent service resolved in that scope.
    #[default]
    Singleton,
    /// New instance per lookup and per injection, never cached
    Transient,
}
