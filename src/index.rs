//! Capability → service index used by autowiring.

use crate::error::{DiError, DiResult};
use crate::internal::FastMap;
use crate::key::{Capability, ServiceId};
use crate::registration::Registry;

/// Reverse index from capability to the services that satisfy it.
///
/// Built once from the registry. A capability may also have a *preferred*
/// service: an alias whose id is the capability's type name (for example
/// `"dyn app::Transformer"`). Configuration picks the preference; the index
/// itself never chooses between candidates.
///
/// # Examples
///
/// ```rust
/// use wiring::{Capability, ServiceCollection, ServiceDefinition, ServiceType};
///
/// trait Transport: Send + Sync {}
/// struct Smtp;
/// impl Transport for Smtp {}
///
/// let smtp = ServiceType::of::<Smtp>().implements::<dyn Transport>(|t| t).construct(|_| Ok(Smtp));
/// let mut services = ServiceCollection::new();
/// services.register(ServiceDefinition::new("smtp", smtp)).unwrap();
/// let container = services.build().unwrap();
///
/// let index = container.type_index();
/// assert_eq!(index.find_for(Capability::of::<dyn Transport>()), ["smtp"]);
/// assert_eq!(index.find_for(Capability::of::<Smtp>()), ["smtp"]);
/// assert!(index.find_for(Capability::of::<String>()).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TypeIndex {
    by_capability: FastMap<Capability, Vec<ServiceId>>,
    preferred: FastMap<Capability, ServiceId>,
}

impl TypeIndex {
    pub(crate) fn build(registry: &Registry) -> Self {
        let mut by_capability: FastMap<Capability, Vec<ServiceId>> = FastMap::default();
        let mut by_name: FastMap<&'static str, Capability> = FastMap::default();

        for definition in registry.all() {
            for capability in definition.service_type().capabilities() {
                by_capability
                    .entry(capability)
                    .or_default()
                    .push(definition.id().clone());
                by_name.insert(capability.name(), capability);
            }
        }

        let mut preferred = FastMap::default();
        for (alias, target) in registry.aliases() {
            if let Some(capability) = by_name.get(alias.as_str()) {
                preferred.insert(*capability, target.clone());
            }
        }

        tracing::debug!(
            capabilities = by_capability.len(),
            preferred = preferred.len(),
            "built type index"
        );
        TypeIndex { by_capability, preferred }
    }

    /// Every service satisfying `capability`, in registration order.
    pub fn find_for(&self, capability: Capability) -> &[ServiceId] {
        self.by_capability
            .get(&capability)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Service configured as the preferred implementation of `capability`.
    pub fn preferred(&self, capability: Capability) -> Option<&ServiceId> {
        self.preferred.get(&capability)
    }

    /// Picks the autowiring candidate for one parameter.
    ///
    /// A preferred service wins; otherwise exactly one candidate is required.
    /// `service` and `parameter` only feed the error context.
    pub fn select(&self, capability: Capability, service: &ServiceId, parameter: &str) -> DiResult<&ServiceId> {
        if let Some(preferred) = self.preferred(capability) {
            return Ok(preferred);
        }
        match self.find_for(capability) {
            [] => Err(DiError::NoCandidate {
                service: service.clone(),
                parameter: parameter.to_string(),
                capability: capability.name(),
            }),
            [only] => Ok(only),
            candidates => Err(DiError::AmbiguousCandidate {
                service: service.clone(),
                parameter: parameter.to_string(),
                capability: capability.name(),
                candidates: candidates.to_vec(),
            }),
        }
    }
}
