//! The built container and its scopes.
//!
//! This module contains the [`ServiceContainer`] produced by
//! [`ServiceCollection::build`](crate::ServiceCollection::build) and the
//! [`Scope`] instance caches it resolves into.

use std::sync::Arc;

use crate::definition::ServiceDefinition;
use crate::descriptors::ServiceDescriptor;
use crate::error::DiResult;
use crate::index::TypeIndex;
use crate::key::ServiceId;
use crate::observer::Observers;
use crate::parameters::ParameterStore;
use crate::registration::{Instance, Registry};
use crate::resolver::Resolver;
use crate::validation::{self, ValidationResult};
use crate::value::ParameterValue;

pub(crate) mod context;
pub mod scope;

pub use scope::Scope;

/// Immutable state shared by the container and all of its scopes.
pub(crate) struct ContainerInner {
    pub(crate) registry: Registry,
    pub(crate) parameters: ParameterStore,
    pub(crate) index: TypeIndex,
    pub(crate) observers: Observers,
}

impl ContainerInner {
    pub(crate) fn resolver(&self) -> Resolver<'_> {
        Resolver {
            registry: &self.registry,
            parameters: &self.parameters,
            index: &self.index,
        }
    }
}

/// Service container resolving services from their definitions.
///
/// Definitions, parameters and the capability index are fixed when the
/// container is built. Services are constructed lazily on first request and
/// singletons are cached in the container's root scope, so every lookup and
/// every dependent receives the same instance.
///
/// # Thread Safety
///
/// The container is `Send + Sync` and cloning it is cheap: clones share the
/// same definitions and the same root scope.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wiring::{Param, ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct Database {
///     url: String,
/// }
///
/// struct UserService {
///     db: Arc<Database>,
/// }
///
/// let database = ServiceType::of::<Database>()
///     .param(Param::new("url"))
///     .construct(|args| Ok(Database { url: args.string("url")?.to_string() }));
/// let users = ServiceType::of::<UserService>()
///     .param(Param::of::<Database>("db"))
///     .construct(|args| Ok(UserService { db: args.service("db")? }));
///
/// let mut services = ServiceCollection::new();
/// services.set_parameter("database_url", "postgres://localhost");
/// services.register(ServiceDefinition::new("database", database).arg("url", "%database_url%"))?;
/// services.register(ServiceDefinition::new("users", users).autowire(true))?;
///
/// let container = services.build()?;
/// let users = container.get::<UserService>("users")?;
/// assert_eq!(users.db.url, "postgres://localhost");
/// assert!(Arc::ptr_eq(&users.db, &container.get::<Database>("database")?));
/// # Ok::<(), wiring::DiError>(())
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    inner: Arc<ContainerInner>,
    root: Arc<Scope>,
}

impl ServiceContainer {
    pub(crate) fn new(inner: ContainerInner) -> Self {
        let inner = Arc::new(inner);
        let root = Arc::new(Scope::new(inner.clone()));
        tracing::debug!(
            services = inner.registry.len(),
            aliases = inner.registry.aliases().len(),
            parameters = inner.parameters.len(),
            observers = inner.observers.len(),
            "service container built"
        );
        ServiceContainer { inner, root }
    }

    /// Instance registered under `id` (or an alias of it), built on first
    /// request and cached if it is a singleton.
    pub fn get_any(&self, id: &str) -> DiResult<Instance> {
        self.root.get_any(id)
    }

    /// Instance registered under `id`, as its concrete type.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        self.root.get(id)
    }

    /// Instance registered under `id`, viewed as trait capability `C`.
    pub fn get_capability<C: ?Sized + Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<C>> {
        self.root.get_capability(id)
    }

    /// Whether `id` names a resolvable service or alias. Never constructs.
    pub fn has(&self, id: &str) -> bool {
        self.root.has(id)
    }

    /// Resolved value of a parameter.
    ///
    /// ```
    /// use wiring::{DiError, ParameterValue, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.set_parameter("host", "localhost");
    /// services.set_parameter("dsn", "smtp://%host%:25");
    /// let container = services.build().unwrap();
    ///
    /// assert_eq!(container.get_parameter("dsn").unwrap(), &ParameterValue::from("smtp://localhost:25"));
    /// assert!(matches!(container.get_parameter("port"), Err(DiError::UnknownParameter { .. })));
    /// ```
    pub fn get_parameter(&self, name: &str) -> DiResult<&ParameterValue> {
        self.inner.parameters.get(name)
    }

    /// All resolved parameters.
    pub fn parameters(&self) -> &ParameterStore {
        &self.inner.parameters
    }

    /// Describes every registered service in registration order without
    /// constructing anything.
    pub fn list_all(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .registry
            .all()
            .iter()
            .map(|definition| ServiceDescriptor::describe(definition, self.inner.registry.aliases()))
            .collect()
    }

    /// All aliases as `(alias, target)`, in registration order.
    pub fn aliases(&self) -> &[(ServiceId, ServiceId)] {
        self.inner.registry.aliases()
    }

    /// Ids of the services carrying `tag`, in registration order.
    pub fn tagged(&self, tag: &str) -> Vec<ServiceId> {
        self.inner.registry.tagged(tag)
    }

    /// Definition registered under `id`, following aliases.
    pub fn definition(&self, id: &str) -> DiResult<&ServiceDefinition> {
        self.inner.registry.find(id)
    }

    /// The capability index used for autowiring.
    pub fn type_index(&self) -> &TypeIndex {
        &self.inner.index
    }

    /// Whether the root scope has already built the singleton behind `id`.
    pub fn is_initialized(&self, id: &str) -> bool {
        self.root.is_initialized(id)
    }

    /// Number of registered services, aliases excluded.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.len() == 0
    }

    /// Creates an independent scope with its own instance cache.
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.inner.clone())
    }

    /// Checks every definition without constructing anything.
    ///
    /// Reports all unknown references, interpolation errors, missing or
    /// unknown arguments, autowiring failures and dependency cycles at once.
    ///
    /// ```
    /// use wiring::{Param, ServiceCollection, ServiceDefinition, ServiceType};
    ///
    /// struct Mailer;
    ///
    /// let mailer = ServiceType::of::<Mailer>()
    ///     .param(Param::new("transport"))
    ///     .construct(|_| Ok(Mailer));
    ///
    /// let mut services = ServiceCollection::new();
    /// services.register(ServiceDefinition::new("mailer", mailer).arg("transport", "%mailer_transport%")).unwrap();
    /// let container = services.build().unwrap();
    ///
    /// let report = container.validate();
    /// assert!(!report.is_valid());
    /// assert!(report.format_issues().contains("mailer_transport"));
    /// ```
    pub fn validate(&self) -> ValidationResult {
        validation::validate(&self.inner)
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("services", &self.inner.registry.len())
            .field("parameters", &self.inner.parameters.len())
            .field("root", &self.root)
            .finish()
    }
}
