//! Service collection module for bootstrapping a container.
//!
//! This module contains the ServiceCollection type used to register
//! definitions, aliases, parameters and observers before building the
//! container.

use std::sync::Arc;

use crate::catalog::TypeCatalog;
use crate::definition::ServiceDefinition;
use crate::error::DiResult;
use crate::index::TypeIndex;
use crate::key::{Capability, ServiceId};
use crate::observer::{DiObserver, Observers};
use crate::parameters::ParameterStore;
use crate::provider::{ContainerInner, ServiceContainer};
use crate::registration::Registry;
use crate::value::ParameterValue;

pub mod module_system;
pub use module_system::*;

/// Mutable bootstrap state: definitions, aliases, parameters and observers.
///
/// Everything is collected here first and frozen by [`build`](Self::build);
/// the resulting container never changes its configuration.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use wiring::{Param, ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct Transport {
///     dsn: String,
/// }
///
/// struct Mailer {
///     transport: Arc<Transport>,
///     sender: String,
/// }
///
/// let transport = ServiceType::of::<Transport>()
///     .param(Param::new("dsn"))
///     .construct(|args| Ok(Transport { dsn: args.string("dsn")?.to_string() }));
/// let mailer = ServiceType::of::<Mailer>()
///     .param(Param::of::<Transport>("transport"))
///     .param(Param::new("sender"))
///     .construct(|args| {
///         Ok(Mailer {
///             transport: args.service("transport")?,
///             sender: args.string("sender")?.to_string(),
///         })
///     });
///
/// let mut services = ServiceCollection::new();
/// services
///     .set_parameter("mailer.host", "localhost")
///     .set_parameter("admin_email", "admin@example.com");
/// services
///     .register(ServiceDefinition::new("transport", transport).arg("dsn", "smtp://%mailer.host%"))?
///     .register(ServiceDefinition::new("mailer", mailer).arg(1usize, "%admin_email%").autowire(true))?
///     .alias("app.mailer", "mailer")?;
///
/// let container = services.build()?;
/// let mailer = container.get::<Mailer>("app.mailer")?;
/// assert_eq!(mailer.transport.dsn, "smtp://localhost");
/// assert_eq!(mailer.sender, "admin@example.com");
/// # Ok::<(), wiring::DiError>(())
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    registry: Registry,
    parameters: ParameterStore,
    observers: Observers,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            parameters: ParameterStore::new(),
            observers: Observers::new(),
        }
    }

    /// Registers a definition.
    ///
    /// Fails with `DuplicateId` when the id is already taken by a service or
    /// an alias.
    pub fn register(&mut self, definition: ServiceDefinition) -> DiResult<&mut Self> {
        tracing::trace!(service = %definition.id(), type_name = definition.service_type().name(), "registering service");
        self.registry.register(definition)?;
        Ok(self)
    }

    /// Makes `alias` resolve to the same instance as `target`.
    ///
    /// The target may be registered later, and may itself be an alias.
    pub fn alias(&mut self, alias: impl Into<ServiceId>, target: impl Into<ServiceId>) -> DiResult<&mut Self> {
        self.registry.alias(alias.into(), target.into())?;
        Ok(self)
    }

    /// Prefers `target` whenever a parameter of capability `C` is autowired,
    /// even if other services implement `C` as well.
    ///
    /// This is an alias named after the capability's type name, so it also
    /// makes `C`'s type name resolvable as an id.
    ///
    /// ```rust
    /// use wiring::{Param, ServiceCollection, ServiceDefinition, ServiceType};
    ///
    /// trait Transformer: Send + Sync {
    ///     fn transform(&self, value: &str) -> String;
    /// }
    ///
    /// struct Upper;
    /// impl Transformer for Upper {
    ///     fn transform(&self, value: &str) -> String { value.to_uppercase() }
    /// }
    ///
    /// struct Rot13;
    /// impl Transformer for Rot13 {
    ///     fn transform(&self, value: &str) -> String { value.to_string() }
    /// }
    ///
    /// struct Twitter {
    ///     transformer: std::sync::Arc<dyn Transformer>,
    /// }
    ///
    /// let upper = ServiceType::of::<Upper>().implements::<dyn Transformer>(|t| t).construct(|_| Ok(Upper));
    /// let rot13 = ServiceType::of::<Rot13>().implements::<dyn Transformer>(|t| t).construct(|_| Ok(Rot13));
    /// let twitter = ServiceType::of::<Twitter>()
    ///     .param(Param::of::<dyn Transformer>("transformer"))
    ///     .construct(|args| Ok(Twitter { transformer: args.capability("transformer")? }));
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .register(ServiceDefinition::new("upper", upper))?
    ///     .register(ServiceDefinition::new("rot13", rot13))?
    ///     .register(ServiceDefinition::new("twitter", twitter).autowire(true))?
    ///     .alias_capability::<dyn Transformer>("upper")?;
    ///
    /// let container = services.build()?;
    /// let twitter = container.get::<Twitter>("twitter")?;
    /// assert_eq!(twitter.transformer.transform("hi"), "HI");
    /// # Ok::<(), wiring::DiError>(())
    /// ```
    pub fn alias_capability<C: ?Sized + 'static>(&mut self, target: impl Into<ServiceId>) -> DiResult<&mut Self> {
        self.alias(Capability::of::<C>().name(), target)
    }

    /// Sets (or replaces) a parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> &mut Self {
        self.parameters.set(name, value);
        self
    }

    /// Parameters collected so far, unresolved.
    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    /// Registers every type of `catalog` as a service named after its catalog
    /// entry.
    pub fn register_catalog(&mut self, catalog: &TypeCatalog, autowire: bool) -> DiResult<&mut Self> {
        for (name, service_type) in catalog.iter() {
            self.register(ServiceDefinition::new(name, service_type.clone()).autowire(autowire))?;
        }
        Ok(self)
    }

    /// Adds an observer notified of every construction.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use wiring::{MetricsObserver, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_observer(Arc::new(MetricsObserver::new()));
    /// ```
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Whether `id` is registered as a service or an alias.
    pub fn has(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    /// Registered definitions in registration order.
    pub fn definitions(&self) -> &[ServiceDefinition] {
        self.registry.all()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Freezes the configuration into a container.
    ///
    /// Resolves every parameter against the others (failing on unknown,
    /// malformed or circular references) and indexes every definition by the
    /// capabilities its type satisfies. Nothing is constructed.
    pub fn build(self) -> DiResult<ServiceContainer> {
        let parameters = self.parameters.resolve_all()?;
        let index = TypeIndex::build(&self.registry);
        Ok(ServiceContainer::new(ContainerInner {
            registry: self.registry,
            parameters,
            index,
            observers: self.observers,
        }))
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("services", &self.registry.len())
            .field("aliases", &self.registry.aliases().len())
            .field("parameters", &self.parameters.len())
            .finish()
    }
}
