//! Service module system for modular registration.
//!
//! This module provides a trait for organizing definitions, aliases and
//! parameters into reusable modules, loaded one after the other into a
//! single collection.

use crate::{DiResult, ServiceCollection};

/// A module that registers its definitions and parameters with a
/// [`ServiceCollection`].
///
/// # Example
///
/// ```rust
/// use wiring::{DiResult, ServiceCollection, ServiceDefinition, ServiceModule, ServiceType};
///
/// struct UserRepository;
///
/// struct UserModule {
///     table: &'static str,
/// }
///
/// impl ServiceModule for UserModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.set_parameter("users.table", self.table);
///         services.register(ServiceDefinition::new(
///             "users.repository",
///             ServiceType::of::<UserRepository>().construct(|_| Ok(UserRepository)),
///         ))?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut services = ServiceCollection::new();
/// services.add_module(UserModule { table: "users" })?;
/// let container = services.build()?;
/// assert!(container.has("users.repository"));
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's services with the collection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

impl ServiceCollection {
    /// Loads a module into the collection.
    ///
    /// Modules share one namespace: a module registering an id that an
    /// earlier one already registered fails with `DuplicateId`.
    pub fn add_module<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
