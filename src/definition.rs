//! Service definitions: what to build, with which explicit arguments.

use std::fmt;

use crate::key::ServiceId;
use crate::lifetime::Lifetime;
use crate::service_type::ServiceType;
use crate::value::ParameterValue;

/// Addresses one constructor parameter, by position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ArgumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKey::Index(i) => write!(f, "#{}", i),
            ArgumentKey::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

impl From<usize> for ArgumentKey {
    fn from(index: usize) -> Self {
        ArgumentKey::Index(index)
    }
}

impl From<&str> for ArgumentKey {
    fn from(name: &str) -> Self {
        ArgumentKey::Name(name.to_string())
    }
}

impl From<String> for ArgumentKey {
    fn from(name: String) -> Self {
        ArgumentKey::Name(name)
    }
}

/// An explicitly configured constructor argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A literal value. Strings inside it (also inside lists and maps) are
    /// interpolated against the parameter store.
    Value(ParameterValue),
    /// A reference to another service (or alias).
    Service(ServiceId),
    /// Every service carrying the tag, in registration order.
    Tagged(String),
}

impl Argument {
    pub fn value(value: impl Into<ParameterValue>) -> Self {
        Argument::Value(value.into())
    }

    pub fn service(id: impl Into<ServiceId>) -> Self {
        Argument::Service(id.into())
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Argument::Tagged(tag.into())
    }
}

macro_rules! argument_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::Value(value.into())
                }
            }
        )*
    };
}

argument_from_value!(ParameterValue, &str, String, bool, i32, i64, u32, f64);

/// Declarative recipe for one service.
///
/// Definitions are produced during bootstrap and are read-only once
/// registered: resolution never mutates them.
///
/// # Examples
///
/// ```rust
/// use wiring::{Argument, Lifetime, Param, ServiceDefinition, ServiceType};
///
/// struct Mailer {
///     sender: String,
/// }
///
/// let mailer = ServiceType::of::<Mailer>()
///     .param(Param::new("sender"))
///     .construct(|args| Ok(Mailer { sender: args.string("sender")?.to_string() }));
///
/// let definition = ServiceDefinition::new("mailer", mailer)
///     .arg("sender", "%admin_email%")
///     .autowire(true)
///     .tag("notifier");
///
/// assert_eq!(definition.id(), "mailer");
/// assert!(definition.is_autowired());
/// assert_eq!(definition.lifetime(), Lifetime::Singleton);
/// assert_eq!(definition.explicit_argument(0, "sender"), Some(&Argument::value("%admin_email%")));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    id: ServiceId,
    service_type: ServiceType,
    arguments: Vec<(ArgumentKey, Argument)>,
    autowire: bool,
    lifetime: Lifetime,
    tags: Vec<String>,
}

impl ServiceDefinition {
    /// New singleton definition, autowiring disabled, no explicit arguments.
    pub fn new(id: impl Into<ServiceId>, service_type: ServiceType) -> Self {
        ServiceDefinition {
            id: id.into(),
            service_type,
            arguments: Vec::new(),
            autowire: false,
            lifetime: Lifetime::Singleton,
            tags: Vec::new(),
        }
    }

    /// Configures a constructor argument. A later entry for the same key
    /// replaces an earlier one.
    pub fn arg(mut self, key: impl Into<ArgumentKey>, argument: impl Into<Argument>) -> Self {
        let key = key.into();
        let argument = argument.into();
        match self.arguments.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = argument,
            None => self.arguments.push((key, argument)),
        }
        self
    }

    pub fn autowire(mut self, enabled: bool) -> Self {
        self.autowire = enabled;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    pub fn arguments(&self) -> &[(ArgumentKey, Argument)] {
        &self.arguments
    }

    pub fn is_autowired(&self) -> bool {
        self.autowire
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Explicit argument for the parameter at `position` named `name`.
    /// A by-name entry takes precedence over a positional one.
    pub fn explicit_argument(&self, position: usize, name: &str) -> Option<&Argument> {
        let by_name = self.arguments.iter().find(|(key, _)| matches!(key, ArgumentKey::Name(n) if n == name));
        let by_index = || self.arguments.iter().find(|(key, _)| *key == ArgumentKey::Index(position));
        by_name.or_else(by_index).map(|(_, argument)| argument)
    }
}
