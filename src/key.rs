//! Service identifiers and capability keys.

use std::any::TypeId;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifier naming one service in the container.
///
/// Identifiers are compared case-sensitively and exactly: `"Logger"` and
/// `"logger"` are two different services. Cloning is cheap (the string is
/// shared), so identifiers are passed around by value freely.
///
/// # Examples
///
/// ```rust
/// use wiring::ServiceId;
///
/// let id = ServiceId::from("message_generator");
/// assert_eq!(id, "message_generator");
/// assert_ne!(id, "Message_Generator");
/// assert_eq!(id.to_string(), "message_generator");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(Arc<str>);

impl ServiceId {
    /// Returns the identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        ServiceId(Arc::from(id))
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        ServiceId(Arc::from(id))
    }
}

impl From<&String> for ServiceId {
    fn from(id: &String) -> Self {
        ServiceId(Arc::from(id.as_str()))
    }
}

impl From<&ServiceId> for ServiceId {
    fn from(id: &ServiceId) -> Self {
        id.clone()
    }
}

// Lets maps keyed by `ServiceId` be queried with a plain `&str`.
impl Borrow<str> for ServiceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for ServiceId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ServiceId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ServiceId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl PartialEq<ServiceId> for &str {
    fn eq(&self, other: &ServiceId) -> bool {
        *self == &*other.0
    }
}

/// Capability a service type satisfies: the concrete type itself or a trait
/// object type such as `dyn Logger`.
///
/// Capabilities are the matching key for autowiring. Equality and hashing use
/// only the `TypeId`; the name is kept for diagnostics and for capability
/// aliases.
///
/// # Examples
///
/// ```rust
/// use wiring::Capability;
///
/// trait Transport: Send + Sync {}
///
/// let cap = Capability::of::<dyn Transport>();
/// assert!(cap.name().ends_with("Transport"));
/// assert_eq!(cap, Capability::of::<dyn Transport>());
/// assert_ne!(cap, Capability::of::<String>());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Capability {
    id: TypeId,
    name: &'static str,
}

impl Capability {
    /// Capability key of `T` (sized or `dyn Trait`).
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Capability {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name, as produced by `std::any::type_name`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for Capability {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Capability {}

impl std::hash::Hash for Capability {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
