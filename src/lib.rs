//! # wiring
//!
//! Definition-driven dependency injection for Rust: services are described by
//! identifier, constructed lazily, wired through explicit configuration or
//! autowiring by capability, and cached once per scope.
//!
//! ## Features
//!
//! - **Definitions by identifier**: each service names a constructible type,
//!   its explicit arguments and whether unconfigured arguments are autowired
//! - **Autowiring by capability**: a parameter typed as a concrete type or a
//!   `dyn Trait` receives the only service satisfying it, or the one an
//!   alias named after the capability prefers
//! - **Parameters**: `%name%` placeholders in configured values, `%%` for a
//!   literal `%`, parameters referencing parameters
//! - **Circular dependency detection**: full cycle paths, nothing cached from
//!   a failed resolution
//! - **Scopes**: one instance per identifier per scope, thread-safe
//!   compute-once caching, disposal in reverse construction order
//! - **Validation**: every configuration defect reported at once, without
//!   constructing anything
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use wiring::{Param, ServiceCollection, ServiceDefinition, ServiceType};
//!
//! struct Logger {
//!     lines: Mutex<Vec<String>>,
//! }
//!
//! struct MessageGenerator {
//!     logger: Arc<Logger>,
//! }
//!
//! impl MessageGenerator {
//!     fn happy_message(&self) -> &'static str {
//!         self.logger.lines.lock().unwrap().push("About to generate a message".into());
//!         "You did it! You updated the system! Amazing!"
//!     }
//! }
//!
//! let logger = ServiceType::of::<Logger>().construct(|_| Ok(Logger { lines: Mutex::new(Vec::new()) }));
//! let generator = ServiceType::of::<MessageGenerator>()
//!     .param(Param::of::<Logger>("logger"))
//!     .construct(|args| Ok(MessageGenerator { logger: args.service("logger")? }));
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .register(ServiceDefinition::new("logger", logger))?
//!     .register(ServiceDefinition::new("message_generator", generator).autowire(true))?;
//!
//! let container = services.build()?;
//! let generator = container.get::<MessageGenerator>("message_generator")?;
//! assert_eq!(generator.happy_message(), "You did it! You updated the system! Amazing!");
//!
//! // Singletons: the second lookup builds nothing and returns the same instance
//! assert!(Arc::ptr_eq(&generator, &container.get::<MessageGenerator>("message_generator")?));
//! assert!(Arc::ptr_eq(&generator.logger, &container.get::<Logger>("logger")?));
//! # Ok::<(), wiring::DiError>(())
//! ```
//!
//! ## Explicit Arguments and Parameters
//!
//! ```rust
//! use wiring::{Argument, Param, ServiceCollection, ServiceDefinition, ServiceType};
//!
//! struct SiteUpdateManager {
//!     admin_email: String,
//! }
//!
//! let manager = ServiceType::of::<SiteUpdateManager>()
//!     .param(Param::new("admin_email"))
//!     .construct(|args| Ok(SiteUpdateManager { admin_email: args.string("admin_email")?.to_string() }));
//!
//! let mut services = ServiceCollection::new();
//! services.set_parameter("admin_email", "manager@example.com");
//! services.register(ServiceDefinition::new("site_update_manager", manager).arg("admin_email", "%admin_email%"))?;
//!
//! let container = services.build()?;
//! let manager = container.get::<SiteUpdateManager>("site_update_manager")?;
//! assert_eq!(manager.admin_email, "manager@example.com");
//! # Ok::<(), wiring::DiError>(())
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton** (default): built once per scope on first request
//! - **Transient**: built fresh on every lookup and every injection

// Module declarations
pub mod catalog;
pub mod collection;
pub mod definition;
pub mod descriptors;
pub mod error;
pub mod index;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod parameters;
pub mod provider;
pub mod service_type;
pub mod traits;
pub mod validation;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

mod arguments;
mod internal;
mod registration;
mod resolver;

// Re-exports
pub use arguments::Arguments;
pub use catalog::TypeCatalog;
pub use collection::{ServiceCollection, ServiceModule};
pub use definition::{Argument, ArgumentKey, ServiceDefinition};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use index::TypeIndex;
pub use key::{Capability, ServiceId};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, MetricsObserver, TracingObserver};
pub use parameters::ParameterStore;
pub use provider::{Scope, ServiceContainer};
pub use registration::Instance;
pub use service_type::{Param, ServiceType, ServiceTypeBuilder};
pub use traits::Dispose;
pub use validation::{ValidationResult, ValidationWarning};
pub use value::ParameterValue;

#[cfg(feature = "config")]
pub use config::{ArgumentRecord, ConfigDocument, DefinitionRecord, ServiceRef, TaggedRef};
