//! Recursive construction of one service from its definition.
//!
//! The resolver decides where every constructor argument comes from and asks
//! an [`InstanceSource`] (a scope) for dependent services, so that caching
//! stays with the scope while argument planning is shared with validation.

use crate::arguments::{Arguments, Resolved};
use crate::definition::{Argument, ArgumentKey, ServiceDefinition};
use crate::error::{DiError, DiResult};
use crate::index::TypeIndex;
use crate::key::ServiceId;
use crate::parameters::ParameterStore;
use crate::provider::context::ResolutionContext;
use crate::registration::{Instance, Registry};
use crate::service_type::Param;
use crate::value::ParameterValue;

/// Hands out instances of dependencies during a resolution.
pub(crate) trait InstanceSource {
    /// Instance of `definition`, built or cached, within `ctx`.
    fn instance_of(&self, definition: &ServiceDefinition, ctx: &mut ResolutionContext) -> DiResult<Instance>;
}

/// Where one constructor argument comes from.
#[derive(Debug)]
pub(crate) enum Plan<'a> {
    /// A configured or default value, still to be interpolated.
    Value(&'a ParameterValue),
    /// An explicitly referenced or autowired service (alias ids allowed).
    Service(&'a ServiceId),
    /// Every service carrying a tag.
    Tagged(Vec<ServiceId>),
}

pub(crate) struct Resolver<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) parameters: &'a ParameterStore,
    pub(crate) index: &'a TypeIndex,
}

impl<'a> Resolver<'a> {
    /// Every explicit argument must target a declared parameter.
    pub(crate) fn check_argument_keys(&self, definition: &ServiceDefinition) -> DiResult<()> {
        let service_type = definition.service_type();
        for (key, _) in definition.arguments() {
            let declared = match key {
                ArgumentKey::Index(position) => *position < service_type.params().len(),
                ArgumentKey::Name(name) => service_type.param_position(name).is_some(),
            };
            if !declared {
                return Err(DiError::UnknownArgument {
                    service: definition.id().clone(),
                    argument: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Chooses the source of the parameter at `position`.
    ///
    /// Explicit arguments win. Otherwise, with autowiring enabled, a
    /// capability-typed parameter takes the index's candidate; a parameter
    /// with no candidate falls back to its default. Ambiguity never does.
    pub(crate) fn plan_parameter<'d>(
        &self,
        definition: &'d ServiceDefinition,
        position: usize,
        param: &'d Param,
    ) -> DiResult<Plan<'d>>
    where
        'a: 'd,
    {
        if let Some(argument) = definition.explicit_argument(position, param.name()) {
            return Ok(match argument {
                Argument::Value(value) => Plan::Value(value),
                Argument::Service(id) => Plan::Service(id),
                Argument::Tagged(tag) => Plan::Tagged(self.registry.tagged(tag)),
            });
        }

        if definition.is_autowired() {
            if let Some(capability) = param.capability() {
                match self.index.select(capability, definition.id(), param.name()) {
                    Ok(id) => return Ok(Plan::Service(id)),
                    Err(DiError::NoCandidate { .. }) if param.default_value().is_some() => {}
                    Err(err) => return Err(err),
                }
            }
        }

        param
            .default_value()
            .map(Plan::Value)
            .ok_or_else(|| DiError::MissingArgument {
                service: definition.id().clone(),
                parameter: param.name().to_string(),
            })
    }

    /// Builds a new instance of `definition`, pulling dependencies from
    /// `source` within `ctx`.
    pub(crate) fn build(
        &self,
        definition: &ServiceDefinition,
        ctx: &mut ResolutionContext,
        source: &dyn InstanceSource,
    ) -> DiResult<Instance> {
        self.check_argument_keys(definition)?;

        ctx.enter(definition.id())?;
        let arguments = self.resolve_arguments(definition, ctx, source);
        ctx.leave();
        let arguments = arguments?;

        tracing::trace!(
            service = %definition.id(),
            type_name = definition.service_type().name(),
            arguments = arguments.len(),
            "instantiating service"
        );
        definition.service_type().instantiate(&arguments)
    }

    fn resolve_arguments(
        &self,
        definition: &ServiceDefinition,
        ctx: &mut ResolutionContext,
        source: &dyn InstanceSource,
    ) -> DiResult<Arguments> {
        let params = definition.service_type().params();
        let mut arguments = Arguments::new(definition.id().clone(), params.len());

        for (position, param) in params.iter().enumerate() {
            let resolved = match self.plan_parameter(definition, position, param)? {
                Plan::Value(value) => Resolved::Value(self.parameters.resolve_value(value)?),
                Plan::Service(id) => Resolved::Service(self.inject(definition, param, id, ctx, source)?),
                Plan::Tagged(ids) => Resolved::Services(
                    ids.iter()
                        .map(|id| self.inject(definition, param, id, ctx, source))
                        .collect::<DiResult<Vec<_>>>()?,
                ),
            };
            arguments.push(param.name(), resolved);
        }
        Ok(arguments)
    }

    /// Resolves the service `id` and views it as the parameter's capability.
    fn inject(
        &self,
        definition: &ServiceDefinition,
        param: &Param,
        id: &ServiceId,
        ctx: &mut ResolutionContext,
        source: &dyn InstanceSource,
    ) -> DiResult<Instance> {
        let target = self
            .registry
            .find(id)
            .map_err(|err| err.required_by(definition.id()))?;
        let instance = source.instance_of(target, ctx)?;

        match param.capability() {
            None => Ok(instance),
            Some(capability) => target
                .service_type()
                .cast(&instance, capability)
                .ok_or_else(|| DiError::TypeMismatch {
                    subject: format!(
                        "service \"{}\" injected into argument \"{}\" of service \"{}\"",
                        target.id(),
                        param.name(),
                        definition.id()
                    ),
                    expected: capability.name(),
                }),
        }
    }
}
