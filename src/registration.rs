//! Definition registry: identifier → definition, plus aliases.

use std::any::Any;
use std::sync::Arc;

use crate::definition::ServiceDefinition;
use crate::error::{DiError, DiResult};
use crate::internal::FastMap;
use crate::key::ServiceId;

/// Type-erased, shared service instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Service registry holding all definitions and aliases
///
/// Definitions are kept in registration order for stable introspection, with
/// a hash index for lookups. Populated during bootstrap, read-only afterwards.
#[derive(Default)]
pub(crate) struct Registry {
    definitions: Vec<ServiceDefinition>,
    positions: FastMap<ServiceId, usize>,
    aliases: Vec<(ServiceId, ServiceId)>,
    alias_positions: FastMap<ServiceId, usize>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a definition; its id must not be taken by a service or alias.
    pub(crate) fn register(&mut self, definition: ServiceDefinition) -> DiResult<()> {
        let id = definition.id().clone();
        if self.contains(&id) {
            return Err(DiError::DuplicateId(id));
        }
        self.positions.insert(id, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Adds an alias. The target does not have to exist yet.
    pub(crate) fn alias(&mut self, alias: ServiceId, target: ServiceId) -> DiResult<()> {
        if self.contains(&alias) {
            return Err(DiError::DuplicateId(alias));
        }
        self.alias_positions.insert(alias.clone(), self.aliases.len());
        self.aliases.push((alias, target));
        Ok(())
    }

    /// Definition registered under exactly `id`; aliases are not followed.
    pub(crate) fn lookup(&self, id: &str) -> DiResult<&ServiceDefinition> {
        self.positions
            .get(id)
            .map(|&position| &self.definitions[position])
            .ok_or_else(|| unknown(id))
    }

    /// Definition for `id`, following alias chains.
    ///
    /// An alias chain that loops back on itself is reported as a
    /// `CircularDependency` over the alias ids.
    pub(crate) fn find(&self, id: &str) -> DiResult<&ServiceDefinition> {
        if let Some(&position) = self.positions.get(id) {
            return Ok(&self.definitions[position]);
        }

        let mut chain: Vec<ServiceId> = Vec::new();
        let mut current = id;
        while let Some(&position) = self.alias_positions.get(current) {
            let (alias, target) = &self.aliases[position];
            if chain.contains(alias) {
                chain.push(alias.clone());
                return Err(DiError::CircularDependency(chain));
            }
            chain.push(alias.clone());
            current = target.as_str();
        }
        self.lookup(current)
    }

    /// Whether `id` names a service or an alias.
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id) || self.alias_positions.contains_key(id)
    }

    /// All definitions in registration order.
    pub(crate) fn all(&self) -> &[ServiceDefinition] {
        &self.definitions
    }

    /// All aliases in registration order, as `(alias, target)`.
    pub(crate) fn aliases(&self) -> &[(ServiceId, ServiceId)] {
        &self.aliases
    }

    /// Ids of every definition carrying `tag`, in registration order.
    pub(crate) fn tagged(&self, tag: &str) -> Vec<ServiceId> {
        self.definitions
            .iter()
            .filter(|definition| definition.has_tag(tag))
            .map(|definition| definition.id().clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }
}

fn unknown(id: &str) -> DiError {
    DiError::UnknownService {
        id: ServiceId::from(id),
        required_by: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_type::ServiceType;

    struct Dummy;

    fn definition(id: &str) -> ServiceDefinition {
        ServiceDefinition::new(id, ServiceType::of::<Dummy>().construct(|_| Ok(Dummy)))
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = Registry::new();
        registry.register(definition("mailer")).unwrap();
        assert!(matches!(
            registry.register(definition("mailer")),
            Err(DiError::DuplicateId(id)) if id == "mailer"
        ));
        assert!(matches!(
            registry.alias("mailer".into(), "other".into()),
            Err(DiError::DuplicateId(_))
        ));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut registry = Registry::new();
        registry.register(definition("Mailer")).unwrap();
        assert!(registry.lookup("Mailer").is_ok());
        assert!(matches!(registry.lookup("mailer"), Err(DiError::UnknownService { .. })));
    }

    #[test]
    fn all_preserves_registration_order() {
        let mut registry = Registry::new();
        for id in ["c", "a", "b"] {
            registry.register(definition(id)).unwrap();
        }
        let ids: Vec<_> = registry.all().iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn find_follows_alias_chains() {
        let mut registry = Registry::new();
        registry.register(definition("app.mailer")).unwrap();
        registry.alias("mailer".into(), "app.mailer".into()).unwrap();
        registry.alias("notifier".into(), "mailer".into()).unwrap();

        assert_eq!(registry.find("notifier").unwrap().id(), "app.mailer");
        assert!(registry.lookup("notifier").is_err());
        assert!(registry.contains("mailer"));
    }

    #[test]
    fn alias_loops_are_circular() {
        let mut registry = Registry::new();
        registry.alias("a".into(), "b".into()).unwrap();
        registry.alias("b".into(), "a".into()).unwrap();

        match registry.find("a") {
            Err(DiError::CircularDependency(path)) => assert_eq!(path, vec!["a", "b", "a"]),
            other => panic!("expected CircularDependency, got {:?}", other.map(|d| d.id().clone())),
        }
    }

    #[test]
    fn dangling_alias_reports_target() {
        let mut registry = Registry::new();
        registry.alias("mailer".into(), "missing".into()).unwrap();
        assert!(matches!(
            registry.find("mailer"),
            Err(DiError::UnknownService { id, .. }) if id == "missing"
        ));
    }
}
