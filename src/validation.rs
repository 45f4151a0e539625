//! Whole-configuration validation without construction.
//!
//! Resolution reports the first defect on the path it happens to walk.
//! Validation walks every definition up front, with the same argument
//! planning the resolver uses, and collects every defect it finds: unknown
//! references, interpolation errors, missing or unknown arguments, autowiring
//! failures and dependency cycles.

use std::collections::HashSet;

use crate::definition::ServiceDefinition;
use crate::error::{DiError, DiResult};
use crate::internal::FastMap;
use crate::key::ServiceId;
use crate::lifetime::Lifetime;
use crate::provider::ContainerInner;
use crate::resolver::Plan;
use crate::service_type::Param;

/// Outcome of [`ServiceContainer::validate`](crate::ServiceContainer::validate).
///
/// # Examples
///
/// ```
/// use wiring::{DiError, Param, ServiceCollection, ServiceDefinition, ServiceType};
///
/// struct A;
/// struct B;
///
/// let a = ServiceType::of::<A>().param(Param::new("b")).construct(|_| Ok(A));
/// let b = ServiceType::of::<B>().param(Param::new("a")).construct(|_| Ok(B));
///
/// let mut services = ServiceCollection::new();
/// services.register(ServiceDefinition::new("a", a).arg("b", wiring::Argument::service("b"))).unwrap();
/// services.register(ServiceDefinition::new("b", b).arg("a", wiring::Argument::service("a"))).unwrap();
///
/// let report = services.build().unwrap().validate();
/// assert_eq!(report.errors.len(), 1);
/// assert!(matches!(&report.errors[0], DiError::CircularDependency(path) if path.len() == 3));
/// ```
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Defects that make resolution fail
    pub errors: Vec<DiError>,
    /// Configurations that resolve but probably do not do what was meant
    pub warnings: Vec<ValidationWarning>,
}

/// A configuration that resolves but is likely unintended.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A singleton receives a transient dependency, which it then keeps for
    /// its whole life
    SingletonCapturesTransient {
        singleton: ServiceId,
        transient: ServiceId,
    },
}

impl ValidationResult {
    /// Returns true if validation found no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The first error, if any, as a `Result`.
    pub fn into_result(self) -> DiResult<()> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Formats errors and warnings for display.
    pub fn format_issues(&self) -> String {
        let mut output = String::new();

        if !self.errors.is_empty() {
            output.push_str("Validation Errors:\n");
            for error in &self.errors {
                output.push_str(&format!("  - {}\n", error));
            }
        }

        if !self.warnings.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("Validation Warnings:\n");
            for warning in &self.warnings {
                output.push_str(&format!("  - {}\n", format_warning(warning)));
            }
        }

        output
    }
}

fn format_warning(warning: &ValidationWarning) -> String {
    match warning {
        ValidationWarning::SingletonCapturesTransient { singleton, transient } => format!(
            "Singleton service \"{}\" keeps a single instance of transient service \"{}\"",
            singleton, transient
        ),
    }
}

pub(crate) fn validate(inner: &ContainerInner) -> ValidationResult {
    let registry = &inner.registry;
    let resolver = inner.resolver();
    let mut result = ValidationResult::default();
    let mut cycles = CycleSet::default();
    let mut graph: FastMap<ServiceId, Vec<ServiceId>> = FastMap::default();

    for (alias, _) in registry.aliases() {
        match registry.find(alias) {
            Err(DiError::CircularDependency(path)) => cycles.insert(path),
            Err(err) => result.errors.push(err),
            Ok(_) => {}
        }
    }

    for definition in registry.all() {
        if let Err(err) = resolver.check_argument_keys(definition) {
            result.errors.push(err);
        }

        let mut edges = Vec::new();
        for (position, param) in definition.service_type().params().iter().enumerate() {
            match resolver.plan_parameter(definition, position, param) {
                Err(err) => result.errors.push(err),
                Ok(Plan::Value(value)) => {
                    if let Err(err) = inner.parameters.resolve_value(value) {
                        result.errors.push(err);
                    }
                }
                Ok(Plan::Service(id)) => {
                    check_target(inner, definition, param, id, &mut edges, &mut result);
                }
                Ok(Plan::Tagged(ids)) => {
                    for id in &ids {
                        check_target(inner, definition, param, id, &mut edges, &mut result);
                    }
                }
            }
        }
        graph.insert(definition.id().clone(), edges);
    }

    for definition in registry.all() {
        detect_cycles(definition.id(), &graph, &mut Vec::new(), &mut HashSet::new(), &mut cycles);
    }
    result
        .errors
        .extend(cycles.into_paths().into_iter().map(DiError::CircularDependency));

    tracing::debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validated container"
    );
    result
}

/// Checks that `id` exists and can be injected into `param`, recording the
/// dependency edge.
fn check_target(
    inner: &ContainerInner,
    definition: &ServiceDefinition,
    param: &Param,
    id: &ServiceId,
    edges: &mut Vec<ServiceId>,
    result: &mut ValidationResult,
) {
    let target = match inner.registry.find(id) {
        Ok(target) => target,
        // Alias loops were already reported while checking the aliases.
        Err(DiError::CircularDependency(_)) => return,
        Err(err) => {
            result.errors.push(err.required_by(definition.id()));
            return;
        }
    };

    if let Some(capability) = param.capability() {
        if !target.service_type().satisfies(capability) {
            result.errors.push(DiError::TypeMismatch {
                subject: format!(
                    "service \"{}\" injected into argument \"{}\" of service \"{}\"",
                    target.id(),
                    param.name(),
                    definition.id()
                ),
                expected: capability.name(),
            });
        }
    }

    if definition.lifetime() == Lifetime::Singleton && target.lifetime() == Lifetime::Transient {
        result.warnings.push(ValidationWarning::SingletonCapturesTransient {
            singleton: definition.id().clone(),
            transient: target.id().clone(),
        });
    }

    edges.push(target.id().clone());
}

fn detect_cycles(
    current: &ServiceId,
    graph: &FastMap<ServiceId, Vec<ServiceId>>,
    path: &mut Vec<ServiceId>,
    visited: &mut HashSet<ServiceId>,
    cycles: &mut CycleSet,
) {
    if let Some(start) = path.iter().position(|id| id == current) {
        let mut cycle = path[start..].to_vec();
        cycle.push(current.clone());
        cycles.insert(cycle);
        return;
    }
    if !visited.insert(current.clone()) {
        return;
    }

    path.push(current.clone());
    if let Some(dependencies) = graph.get(current) {
        for dependency in dependencies {
            detect_cycles(dependency, graph, path, visited, cycles);
        }
    }
    path.pop();
}

/// Cycle paths, each reported once whichever member it was entered from.
#[derive(Default)]
struct CycleSet {
    paths: Vec<Vec<ServiceId>>,
    seen: HashSet<Vec<ServiceId>>,
}

impl CycleSet {
    fn insert(&mut self, path: Vec<ServiceId>) {
        if self.seen.insert(rotation_key(&path)) {
            self.paths.push(path);
        }
    }

    fn into_paths(self) -> Vec<Vec<ServiceId>> {
        self.paths
    }
}

/// The cycle's members (closing repeat dropped) rotated to start at the
/// smallest id.
fn rotation_key(path: &[ServiceId]) -> Vec<ServiceId> {
    let members = &path[..path.len().saturating_sub(1)];
    let start = members
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(position, _)| position);
    members[start..].iter().chain(&members[..start]).cloned().collect()
}
