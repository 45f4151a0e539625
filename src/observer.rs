//! Diagnostic observers for service construction.
//!
//! This module provides hooks for observing construction events, for
//! structured tracing, performance monitoring and debugging of service wiring.
//! Observers are only consulted when at least one is registered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::ServiceId;

/// Observer trait for service construction events.
///
/// Cache hits are not reported: an observer sees each instance being built,
/// so a singleton shows up once per scope and a transient on every lookup or
/// injection.
///
/// # Performance
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
/// use wiring::{DiObserver, ServiceCollection, ServiceDefinition, ServiceId, ServiceType};
///
/// #[derive(Default)]
/// struct Recorder {
///     built: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, _id: &ServiceId) {}
///
///     fn resolved(&self, id: &ServiceId, _duration: Duration) {
///         self.built.lock().unwrap().push(id.to_string());
///     }
/// }
///
/// struct Clock;
///
/// let recorder = Arc::new(Recorder::default());
/// let mut services = ServiceCollection::new();
/// services.add_observer(recorder.clone());
/// services
///     .register(ServiceDefinition::new("clock", ServiceType::of::<Clock>().construct(|_| Ok(Clock))))
///     .unwrap();
///
/// let container = services.build().unwrap();
/// container.get::<Clock>("clock").unwrap();
/// container.get::<Clock>("clock").unwrap();
/// assert_eq!(*recorder.built.lock().unwrap(), vec!["clock".to_string()]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a service's arguments are resolved.
    fn resolving(&self, id: &ServiceId);

    /// Called after a service was constructed.
    ///
    /// `duration` covers resolving its arguments and running its constructor.
    fn resolved(&self, id: &ServiceId, duration: Duration);

    /// Called when constructing a service failed. The error still propagates
    /// to the caller afterwards.
    fn failed(&self, id: &ServiceId, error: &DiError) {
        let _ = (id, error);
    }
}

/// Registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, id: &ServiceId) {
        for observer in &self.observers {
            observer.resolving(id);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, id: &ServiceId, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(id, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, id: &ServiceId, error: &DiError) {
        for observer in &self.observers {
            observer.failed(id, error);
        }
    }
}

/// Built-in observer that reports construction through `tracing`.
///
/// Events are emitted at `DEBUG` (constructed) and `WARN` (failed) level
/// under the `wiring::observer` target; install any `tracing` subscriber to
/// see them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wiring::{ServiceCollection, TracingObserver};
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(TracingObserver::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    label: Option<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `container` field to every event, to tell containers apart.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("default")
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, id: &ServiceId) {
        tracing::trace!(target: "wiring::observer", container = self.label(), service = %id, "resolving");
    }

    fn resolved(&self, id: &ServiceId, duration: Duration) {
        tracing::debug!(
            target: "wiring::observer",
            container = self.label(),
            service = %id,
            elapsed_us = duration.as_micros() as u64,
            "constructed"
        );
    }

    fn failed(&self, id: &ServiceId, error: &DiError) {
        tracing::warn!(
            target: "wiring::observer",
            container = self.label(),
            service = %id,
            error = %error,
            "construction failed"
        );
    }
}

/// Built-in observer counting constructions, failures and construction time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wiring::{MetricsObserver, ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct Clock;
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let mut services = ServiceCollection::new();
/// services.add_observer(metrics.clone());
/// services
///     .register(ServiceDefinition::new("clock", ServiceType::of::<Clock>().construct(|_| Ok(Clock))))
///     .unwrap();
///
/// let container = services.build().unwrap();
/// container.get::<Clock>("clock").unwrap();
/// assert!(container.get_any("missing").is_err());
///
/// assert_eq!(metrics.constructed_count(), 1);
/// assert_eq!(metrics.failure_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MetricsObserver {
    constructed: AtomicU64,
    failed: AtomicU64,
    total_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances successfully constructed.
    pub fn constructed_count(&self) -> u64 {
        self.constructed.load(Ordering::Relaxed)
    }

    /// Constructions that failed. A failure deep in a dependency chain is
    /// counted once for every service on the chain.
    pub fn failure_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Time spent constructing, summed over all constructions. Nested
    /// constructions are counted inside their dependents too.
    pub fn total_time(&self) -> Duration {
        Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed))
    }

    pub fn reset(&self) {
        self.constructed.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _id: &ServiceId) {}

    fn resolved(&self, _id: &ServiceId, duration: Duration) {
        self.constructed.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn failed(&self, _id: &ServiceId, _error: &DiError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}
