//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (e.g., flushing caches,
/// closing connections) and mark their service type with
/// [`disposable`](crate::ServiceTypeBuilder::disposable). Hooks of cached instances run in
/// LIFO order when their scope is reset or dropped.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use wiring::{Dispose, ServiceCollection, ServiceDefinition, ServiceType};
///
/// static FLUSHED: AtomicBool = AtomicBool::new(false);
///
/// struct Cache;
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         FLUSHED.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let cache = ServiceType::of::<Cache>().disposable().construct(|_| Ok(Cache));
/// let mut services = ServiceCollection::new();
/// services.register(ServiceDefinition::new("cache", cache)).unwrap();
/// let container = services.build().unwrap();
///
/// let mut scope = container.create_scope();
/// scope.get::<Cache>("cache").unwrap();
/// scope.reset();
/// assert!(FLUSHED.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
