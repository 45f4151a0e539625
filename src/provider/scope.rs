//! Instance caches and their lifecycle.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use super::context::{ResolutionContext, WaitGraph};
use super::ContainerInner;
use crate::arguments::downcast_view;
use crate::definition::ServiceDefinition;
use crate::error::{DiError, DiResult};
use crate::internal::{DisposeBag, FastMap};
use crate::key::{Capability, ServiceId};
use crate::lifetime::Lifetime;
use crate::registration::Instance;
use crate::resolver::InstanceSource;
use crate::value::ParameterValue;

type InstanceCache = FastMap<ServiceId, OnceCell<Instance>>;

/// One instance cache over the container's definitions.
///
/// Every singleton is built at most once per scope, on first request,
/// whether it is requested directly or reached as a dependency of another
/// service. Scopes share the container's definitions, parameters and type
/// index but never share instances: the container resolves into its own root
/// scope, and [`ServiceContainer::create_scope`](crate::ServiceContainer::create_scope)
/// hands out fresh ones (one per request or worker, for example).
///
/// A scope may be shared between threads. Two threads asking for the same
/// identifier never build it twice: the second waits for the first and
/// receives the same instance. Unrelated identifiers never block each other.
/// Threads that would wait on each other's half-built services in a loop get
/// [`DiError::CircularDependency`] instead of blocking.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use wiring::{ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct Session;
///
/// let mut services = ServiceCollection::new();
/// services
///     .register(ServiceDefinition::new("session", ServiceType::of::<Session>().construct(|_| Ok(Session))))
///     .unwrap();
/// let container = services.build().unwrap();
///
/// let first = container.create_scope();
/// let second = container.create_scope();
///
/// let a = first.get::<Session>("session").unwrap();
/// assert!(Arc::ptr_eq(&a, &first.get::<Session>("session").unwrap()));
/// assert!(!Arc::ptr_eq(&a, &second.get::<Session>("session").unwrap()));
/// ```
pub struct Scope {
    inner: Arc<ContainerInner>,
    cache: InstanceCache,
    disposers: Mutex<DisposeBag>,
    waits: Mutex<WaitGraph>,
}

impl Scope {
    pub(crate) fn new(inner: Arc<ContainerInner>) -> Self {
        let cache = empty_cache(&inner);
        Scope {
            inner,
            cache,
            disposers: Mutex::new(DisposeBag::default()),
            waits: Mutex::new(WaitGraph::default()),
        }
    }

    /// Instance registered under `id` (or an alias of it), built on first
    /// request.
    pub fn get_any(&self, id: &str) -> DiResult<Instance> {
        let definition = self.inner.registry.find(id)?;
        let mut ctx = ResolutionContext::new();
        self.instance_of(definition, &mut ctx)
    }

    /// Instance registered under `id`, as its concrete type.
    pub fn get<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        self.get_any(id)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                subject: format!("service \"{}\"", id),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Instance registered under `id`, viewed as trait capability `C`.
    ///
    /// The service's type must declare `C` through
    /// [`ServiceTypeBuilder::implements`](crate::ServiceTypeBuilder::implements).
    /// Use [`get`](Self::get) for the concrete type.
    pub fn get_capability<C: ?Sized + Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<C>> {
        let definition = self.inner.registry.find(id)?;
        let mut ctx = ResolutionContext::new();
        let instance = self.instance_of(definition, &mut ctx)?;
        definition
            .service_type()
            .cast(&instance, Capability::of::<C>())
            .and_then(|view| downcast_view::<C>(&view))
            .ok_or_else(|| DiError::TypeMismatch {
                subject: format!("service \"{}\"", id),
                expected: std::any::type_name::<C>(),
            })
    }

    /// Whether `id` names a resolvable service or alias. Never constructs.
    pub fn has(&self, id: &str) -> bool {
        self.inner.registry.find(id).is_ok()
    }

    /// Resolved value of a parameter.
    pub fn get_parameter(&self, name: &str) -> DiResult<&ParameterValue> {
        self.inner.parameters.get(name)
    }

    /// Whether this scope has already built the singleton behind `id`.
    pub fn is_initialized(&self, id: &str) -> bool {
        self.inner
            .registry
            .find(id)
            .ok()
            .and_then(|definition| self.cache.get(definition.id()))
            .map_or(false, |cell| cell.get().is_some())
    }

    /// Number of singletons built so far.
    pub fn initialized_count(&self) -> usize {
        self.cache.values().filter(|cell| cell.get().is_some()).count()
    }

    /// Disposes every cached disposable instance (most recently built first)
    /// and discards all cached instances.
    ///
    /// Instances already handed out stay alive for as long as callers hold
    /// them; the next lookup builds new ones.
    pub fn reset(&mut self) {
        let disposed = self.disposers.get_mut().run_all_reverse();
        self.cache = empty_cache(&self.inner);
        tracing::debug!(disposed, "scope reset");
    }

    fn construct(&self, definition: &ServiceDefinition, ctx: &mut ResolutionContext) -> DiResult<Instance> {
        let observers = &self.inner.observers;
        let observed = observers.has_observers();
        let started = Instant::now();
        if observed {
            observers.resolving(definition.id());
        }

        let result = self.inner.resolver().build(definition, ctx, self);

        match &result {
            Ok(_) => {
                let elapsed = started.elapsed();
                tracing::debug!(
                    service = %definition.id(),
                    depth = ctx.depth(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "built service"
                );
                if observed {
                    observers.resolved(definition.id(), elapsed);
                }
            }
            Err(err) => {
                if observed {
                    observers.failed(definition.id(), err);
                }
            }
        }
        result
    }

    fn register_disposer(&self, definition: &ServiceDefinition, instance: &Instance) {
        if let Some(hook) = definition.service_type().dispose_hook() {
            let hook = hook.clone();
            let instance = instance.clone();
            let id = definition.id().clone();
            self.disposers.lock().push(Box::new(move || {
                tracing::trace!(service = %id, "disposing service");
                hook(&instance);
            }));
        }
    }
}

impl InstanceSource for Scope {
    fn instance_of(&self, definition: &ServiceDefinition, ctx: &mut ResolutionContext) -> DiResult<Instance> {
        let cell = match (definition.lifetime(), self.cache.get(definition.id())) {
            (Lifetime::Singleton, Some(cell)) => cell,
            _ => return self.construct(definition, ctx),
        };
        if let Some(instance) = cell.get() {
            return Ok(instance.clone());
        }

        // A cycle back into a cell that is still initializing would block
        // forever inside `get_or_try_init`, so the stack and the other
        // resolutions' waits are checked first.
        ctx.check(definition.id())?;
        self.waits.lock().wait_for(ctx, definition.id())?;
        let result = cell.get_or_try_init(|| {
            let _building = Building::start(&self.waits, ctx, definition.id());
            let instance = self.construct(definition, ctx)?;
            self.register_disposer(definition, &instance);
            Ok::<_, DiError>(instance)
        });
        self.waits.lock().stop_waiting(ctx);
        Ok(result?.clone())
    }
}

/// Marks a singleton as being built by one resolution until dropped.
struct Building<'s> {
    waits: &'s Mutex<WaitGraph>,
    id: ServiceId,
}

impl<'s> Building<'s> {
    fn start(waits: &'s Mutex<WaitGraph>, ctx: &ResolutionContext, id: &ServiceId) -> Self {
        waits.lock().start_building(ctx, id);
        Building { waits, id: id.clone() }
    }
}

impl Drop for Building<'_> {
    fn drop(&mut self) {
        self.waits.lock().finish_building(&self.id);
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let bag = self.disposers.get_mut();
        if !bag.is_empty() {
            let disposed = bag.run_all_reverse();
            tracing::debug!(disposed, "scope dropped");
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("services", &self.inner.registry.len())
            .field("initialized", &self.initialized_count())
            .finish()
    }
}

fn empty_cache(inner: &ContainerInner) -> InstanceCache {
    inner
        .registry
        .all()
        .iter()
        .filter(|definition| definition.lifetime() == Lifetime::Singleton)
        .map(|definition| (definition.id().clone(), OnceCell::new()))
        .collect()
}
