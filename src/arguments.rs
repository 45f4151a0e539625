//! Resolved constructor arguments handed to service constructors.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::ServiceId;
use crate::registration::Instance;
use crate::value::ParameterValue;

/// One resolved argument.
#[derive(Clone)]
pub(crate) enum Resolved {
    Value(ParameterValue),
    Service(Instance),
    Services(Vec<Instance>),
}

/// The resolved argument list of one construction, in declared parameter
/// order.
///
/// Service arguments declared with a trait capability (`Param::of::<dyn T>`)
/// are read back with [`capability`](Self::capability); concrete service
/// arguments with [`service`](Self::service); configuration values with
/// [`value`](Self::value) and the typed shorthands.
///
/// Every accessor fails with `TypeMismatch` when the argument exists but has
/// another shape, and with `UnknownArgument` when the constructor asks for a
/// parameter it never declared.
pub struct Arguments {
    service: ServiceId,
    entries: Vec<(String, Resolved)>,
}

impl Arguments {
    pub(crate) fn new(service: ServiceId, capacity: usize) -> Self {
        Arguments {
            service,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: Resolved) {
        self.entries.push((name.to_string(), value));
    }

    /// Identifier of the service being constructed.
    pub fn service_id(&self) -> &ServiceId {
        &self.service
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameter names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// A configuration value argument.
    pub fn value(&self, name: &str) -> DiResult<&ParameterValue> {
        match self.entry(name)? {
            Resolved::Value(value) => Ok(value),
            _ => Err(self.mismatch(name, "configuration value")),
        }
    }

    pub fn string(&self, name: &str) -> DiResult<&str> {
        self.value(name)?
            .as_str()
            .ok_or_else(|| self.mismatch(name, "string"))
    }

    pub fn int(&self, name: &str) -> DiResult<i64> {
        self.value(name)?
            .as_i64()
            .ok_or_else(|| self.mismatch(name, "integer"))
    }

    pub fn float(&self, name: &str) -> DiResult<f64> {
        self.value(name)?
            .as_f64()
            .ok_or_else(|| self.mismatch(name, "float"))
    }

    pub fn bool(&self, name: &str) -> DiResult<bool> {
        self.value(name)?
            .as_bool()
            .ok_or_else(|| self.mismatch(name, "boolean"))
    }

    /// A concrete service argument.
    pub fn service<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        match self.entry(name)? {
            Resolved::Service(instance) => instance
                .clone()
                .downcast::<T>()
                .map_err(|_| self.mismatch(name, std::any::type_name::<T>())),
            _ => Err(self.mismatch(name, std::any::type_name::<T>())),
        }
    }

    /// A service argument injected as trait capability `C`.
    pub fn capability<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<C>> {
        match self.entry(name)? {
            Resolved::Service(instance) => downcast_view::<C>(instance)
                .ok_or_else(|| self.mismatch(name, std::any::type_name::<C>())),
            _ => Err(self.mismatch(name, std::any::type_name::<C>())),
        }
    }

    /// A tagged collection of concrete services.
    pub fn services<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Vec<Arc<T>>> {
        match self.entry(name)? {
            Resolved::Services(instances) => instances
                .iter()
                .map(|instance| {
                    instance
                        .clone()
                        .downcast::<T>()
                        .map_err(|_| self.mismatch(name, std::any::type_name::<T>()))
                })
                .collect(),
            _ => Err(self.mismatch(name, "tagged service list")),
        }
    }

    /// A tagged collection injected as trait capability `C`.
    pub fn capabilities<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> DiResult<Vec<Arc<C>>> {
        match self.entry(name)? {
            Resolved::Services(instances) => instances
                .iter()
                .map(|instance| {
                    downcast_view::<C>(instance)
                        .ok_or_else(|| self.mismatch(name, std::any::type_name::<C>()))
                })
                .collect(),
            _ => Err(self.mismatch(name, "tagged service list")),
        }
    }

    /// Builds a `Construction` error for the service being constructed.
    ///
    /// ```rust
    /// use wiring::{DiError, Param, ServiceCollection, ServiceDefinition, ServiceType};
    ///
    /// struct Pool {
    ///     size: i64,
    /// }
    ///
    /// let pool = ServiceType::of::<Pool>()
    ///     .param(Param::new("size"))
    ///     .construct(|args| {
    ///         let size = args.int("size")?;
    ///         if size <= 0 {
    ///             return Err(args.fail("pool size must be positive"));
    ///         }
    ///         Ok(Pool { size })
    ///     });
    ///
    /// let mut services = ServiceCollection::new();
    /// services.register(ServiceDefinition::new("pool", pool).arg("size", 0)).unwrap();
    /// let container = services.build().unwrap();
    ///
    /// assert!(matches!(container.get::<Pool>("pool"), Err(DiError::Construction { .. })));
    /// ```
    pub fn fail(&self, message: impl std::fmt::Display) -> DiError {
        DiError::Construction {
            service: self.service.clone(),
            message: message.to_string(),
        }
    }

    fn entry(&self, name: &str) -> DiResult<&Resolved> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
            .ok_or_else(|| DiError::UnknownArgument {
                service: self.service.clone(),
                argument: format!("\"{}\"", name),
            })
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> DiError {
        DiError::TypeMismatch {
            subject: format!("argument \"{}\" of service \"{}\"", name, self.service),
            expected,
        }
    }
}

/// Reads a capability view (`Arc<C>` boxed in an instance) back out.
pub(crate) fn downcast_view<C: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Option<Arc<C>> {
    instance.downcast_ref::<Arc<C>>().cloned()
}
