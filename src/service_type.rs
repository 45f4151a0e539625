//! Constructible service types: constructor parameters, implemented
//! capabilities and the constructor itself.
//!
//! Rust has no runtime reflection, so a service type describes ahead of time
//! what a reflective container would discover: the ordered constructor
//! parameters with their optional capability type, and the capabilities the
//! type can be injected as. The capability map is resolved when the container
//! is built, never by probing instances at runtime.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::arguments::Arguments;
use crate::error::DiResult;
use crate::key::Capability;
use crate::registration::Instance;
use crate::traits::Dispose;
use crate::value::ParameterValue;

type Constructor = Arc<dyn Fn(&Arguments) -> DiResult<Instance> + Send + Sync>;
type Caster = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;
pub(crate) type DisposeHook = Arc<dyn Fn(&Instance) + Send + Sync>;

/// One declared constructor parameter.
///
/// # Examples
///
/// ```rust
/// use wiring::{Capability, Param};
///
/// trait Logger: Send + Sync {}
///
/// let level = Param::new("level").with_default("info");
/// assert!(level.capability().is_none());
///
/// let logger = Param::of::<dyn Logger>("logger");
/// assert_eq!(logger.capability(), Some(Capability::of::<dyn Logger>()));
/// ```
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    capability: Option<Capability>,
    default: Option<ParameterValue>,
}

impl Param {
    /// Untyped parameter: it can only be filled explicitly or by its default.
    pub fn new(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            capability: None,
            default: None,
        }
    }

    /// Parameter requiring capability `T`, eligible for autowiring.
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            capability: Some(Capability::of::<T>()),
            default: None,
        }
    }

    /// Value used when nothing else fills the parameter.
    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> Option<Capability> {
        self.capability
    }

    pub fn default_value(&self) -> Option<&ParameterValue> {
        self.default.as_ref()
    }
}

/// Type-erased recipe for building one concrete type.
///
/// Created through [`ServiceType::of`]. Cloning is cheap; the same service
/// type may back several definitions with different arguments.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use wiring::{Capability, Param, ServiceType};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct EnglishGreeter {
///     name: String,
/// }
///
/// impl Greeter for EnglishGreeter {
///     fn greet(&self) -> String {
///         format!("Hello, {}", self.name)
///     }
/// }
///
/// let greeter = ServiceType::of::<EnglishGreeter>()
///     .param(Param::new("name"))
///     .implements::<dyn Greeter>(|g| g)
///     .construct(|args| Ok(EnglishGreeter { name: args.string("name")?.to_string() }));
///
/// assert!(greeter.satisfies(Capability::of::<EnglishGreeter>()));
/// assert!(greeter.satisfies(Capability::of::<dyn Greeter>()));
/// assert_eq!(greeter.params().len(), 1);
/// ```
#[derive(Clone)]
pub struct ServiceType {
    inner: Arc<ServiceTypeInner>,
}

struct ServiceTypeInner {
    name: &'static str,
    concrete: Capability,
    implements: Vec<(Capability, Caster)>,
    params: Vec<Param>,
    constructor: Constructor,
    dispose: Option<DisposeHook>,
}

impl ServiceType {
    /// Starts describing how to build `T`.
    pub fn of<T: Send + Sync + 'static>() -> ServiceTypeBuilder<T> {
        ServiceTypeBuilder {
            params: Vec::new(),
            implements: Vec::new(),
            dispose: None,
            _marker: PhantomData,
        }
    }

    /// Concrete type name, as produced by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Declared constructor parameters in order.
    pub fn params(&self) -> &[Param] {
        &self.inner.params
    }

    /// Every capability the type satisfies, the concrete type first.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        std::iter::once(self.inner.concrete).chain(self.inner.implements.iter().map(|(cap, _)| *cap))
    }

    pub fn satisfies(&self, capability: Capability) -> bool {
        self.capabilities().any(|cap| cap == capability)
    }

    /// Whether instances register a dispose hook with their scope.
    pub fn is_disposable(&self) -> bool {
        self.inner.dispose.is_some()
    }

    pub(crate) fn param_position(&self, name: &str) -> Option<usize> {
        self.inner.params.iter().position(|p| p.name == name)
    }

    /// Views a concrete instance of this type as `capability`.
    ///
    /// The concrete capability is the instance itself; trait capabilities are
    /// the upcast `Arc<dyn Trait>` boxed into an instance. Both share the same
    /// allocation, so identity is preserved.
    pub(crate) fn cast(&self, instance: &Instance, capability: Capability) -> Option<Instance> {
        if capability == self.inner.concrete {
            return Some(instance.clone());
        }
        self.inner
            .implements
            .iter()
            .find(|(cap, _)| *cap == capability)
            .and_then(|(_, cast)| cast(instance))
    }

    pub(crate) fn instantiate(&self, args: &Arguments) -> DiResult<Instance> {
        (self.inner.constructor)(args)
    }

    pub(crate) fn dispose_hook(&self) -> Option<&DisposeHook> {
        self.inner.dispose.as_ref()
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceType")
            .field("name", &self.inner.name)
            .field("params", &self.inner.params)
            .field(
                "implements",
                &self.inner.implements.iter().map(|(cap, _)| cap.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder returned by [`ServiceType::of`].
pub struct ServiceTypeBuilder<T> {
    params: Vec<Param>,
    implements: Vec<(Capability, Caster)>,
    dispose: Option<DisposeHook>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ServiceTypeBuilder<T> {
    /// Appends a constructor parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Declares that `T` can be injected as capability `C`.
    ///
    /// `upcast` is normally the identity closure `|t| t`, which lets the
    /// compiler perform the unsizing coercion to `Arc<dyn Trait>`.
    pub fn implements<C>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        if TypeId::of::<C>() == TypeId::of::<T>() {
            return self;
        }
        let cast: Caster = Arc::new(move |instance: &Instance| {
            instance
                .clone()
                .downcast::<T>()
                .ok()
                .map(|concrete| Arc::new(upcast(concrete)) as Instance)
        });
        self.implements.push((Capability::of::<C>(), cast));
        self
    }

    /// Runs [`Dispose::dispose`] on cached instances when their scope is
    /// reset or dropped.
    pub fn disposable(mut self) -> Self
    where
        T: Dispose,
    {
        self.dispose = Some(Arc::new(|instance: &Instance| {
            if let Some(service) = instance.downcast_ref::<T>() {
                service.dispose();
            }
        }));
        self
    }

    /// Finishes the description with the constructor.
    ///
    /// The constructor receives the resolved arguments in declared order and
    /// never the container itself.
    pub fn construct<F>(self, constructor: F) -> ServiceType
    where
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let constructor: Constructor = Arc::new(move |args: &Arguments| {
            constructor(args).map(|value| Arc::new(value) as Instance)
        });
        ServiceType {
            inner: Arc::new(ServiceTypeInner {
                name: std::any::type_name::<T>(),
                concrete: Capability::of::<T>(),
                implements: self.implements,
                params: self.params,
                constructor,
                dispose: self.dispose,
            }),
        }
    }
}
