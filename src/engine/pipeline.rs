// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::{Duration, Instant};

use crate::callbacks::Dispatcher;
use crate::config::consts::{DEFAULT_EPOCHS, DEFAULT_STEPS_PER_EPOCH};
use crate::config::{Backend, ConfigNode, DeviceCategory, PipelineConfig, StepConfig};
use crate::errors::RunError;
use crate::observability::messages::pipeline::{PipelineCompleted, PipelineStarted, StepStarted};
use crate::observability::messages::StructuredLog;
use crate::registry::{Category, Params, RegistryContext};

use super::runner::{EpochRunner, RunBudget, RunReport};

/// A component reference in a step config: `"Name"` or `{type: Name, ...params}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub type_name: String,
    pub params: Params,
}

impl ComponentSpec {
    pub fn from_node(step: &str, key: &str, node: &ConfigNode) -> Result<Self, RunError> {
        let misconfigured = |reason: String| RunError::StepConfig {
            step: step.to_string(),
            reason,
        };

        match node {
            ConfigNode::String(name) => Ok(Self {
                type_name: name.clone(),
                params: Params::new(),
            }),
            ConfigNode::Mapping(map) => {
                let type_name = map
                    .get("type")
                    .and_then(ConfigNode::as_str)
                    .ok_or_else(|| misconfigured(format!("'{}' needs a string 'type'", key)))?;
                let params = map
                    .iter()
                    .filter(|(k, _)| k.as_str() != "type")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(Self {
                    type_name: type_name.to_string(),
                    params,
                })
            }
            other => Err(misconfigured(format!(
                "'{}' must be a name or a mapping, found {}",
                key,
                other.kind()
            ))),
        }
    }
}

/// What one pipeline step asks the runner to build and run.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPlan {
    pub name: String,
    pub estimator: ComponentSpec,
    pub callbacks: Vec<ComponentSpec>,
    pub budget: RunBudget,
}

impl StepPlan {
    pub fn from_step(step: &StepConfig) -> Result<Self, RunError> {
        let name = step.name.as_str();
        let misconfigured = |reason: String| RunError::StepConfig {
            step: name.to_string(),
            reason,
        };

        let estimator = step
            .get("estimator")
            .ok_or_else(|| misconfigured("missing 'estimator'".to_string()))
            .and_then(|node| ComponentSpec::from_node(name, "estimator", node))?;

        let callbacks = match step.get("callbacks") {
            None | Some(ConfigNode::Null) => Vec::new(),
            Some(ConfigNode::Sequence(items)) => items
                .iter()
                .map(|item| ComponentSpec::from_node(name, "callbacks", item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(single) => vec![ComponentSpec::from_node(name, "callbacks", single)?],
        };

        let count = |key: &str, default: usize| -> Result<usize, RunError> {
            match step.get(key) {
                None | Some(ConfigNode::Null) => Ok(default),
                Some(node) => node
                    .as_i64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        misconfigured(format!("'{}' must be a non-negative integer", key))
                    }),
            }
        };

        Ok(Self {
            name: name.to_string(),
            estimator,
            callbacks,
            budget: RunBudget {
                epochs: count("epochs", DEFAULT_EPOCHS)?,
                steps_per_epoch: count("steps_per_epoch", DEFAULT_STEPS_PER_EPOCH)?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub backend: Backend,
    pub device_category: DeviceCategory,
    pub steps: Vec<RunReport>,
    pub duration: Duration,
}

/// Runs every step of a pipeline in order against one registry context.
pub struct PipelineRunner<'a> {
    ctx: &'a RegistryContext,
    dispatcher: Dispatcher,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(ctx: &'a RegistryContext) -> Self {
        Self {
            ctx,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Plan every step up front, then run them in pipeline order.
    ///
    /// The pipeline's `general.registration` policy is applied to the
    /// context's factory before the first step. A malformed step fails before
    /// any step starts; factory and estimator errors surface at the step that
    /// hits them.
    pub fn run(&mut self, config: &PipelineConfig) -> Result<PipelineReport, RunError> {
        let plans = config
            .steps()
            .iter()
            .map(StepPlan::from_step)
            .collect::<Result<Vec<_>, _>>()?;

        let general = config.general();
        self.ctx.factory().set_policy(general.registration);
        let backend = general.backend.to_string();
        let device_category = general.device_category.to_string();
        let started = Instant::now();
        let span = PipelineStarted {
            backend: &backend,
            device_category: &device_category,
            step_count: plans.len(),
        };
        span.log();
        let _guard = span.span("pipeline_run").entered();

        let mut steps = Vec::with_capacity(plans.len());
        for plan in &plans {
            steps.push(self.run_step(plan)?);
        }

        let duration = started.elapsed();
        PipelineCompleted {
            step_count: steps.len(),
            duration,
        }
        .log();

        Ok(PipelineReport {
            backend: general.backend,
            device_category: general.device_category,
            steps,
            duration,
        })
    }

    pub fn run_step(&mut self, plan: &StepPlan) -> Result<RunReport, RunError> {
        let factory = self.ctx.factory();
        self.dispatcher.clear();

        let mut estimator = factory
            .create_instance(
                &Category::ESTIMATOR,
                &plan.estimator.type_name,
                plan.estimator.params.clone(),
            )?
            .into_estimator()
            .ok_or_else(|| RunError::StepConfig {
                step: plan.name.clone(),
                reason: format!("'{}' is not an estimator", plan.estimator.type_name),
            })?;

        for spec in &plan.callbacks {
            let hook = factory
                .create_instance(&Category::CALLBACK, &spec.type_name, spec.params.clone())?
                .into_hook()
                .ok_or_else(|| RunError::StepConfig {
                    step: plan.name.clone(),
                    reason: format!("'{}' is not a callback", spec.type_name),
                })?;
            self.dispatcher.register_hook(hook);
        }

        let started = StepStarted {
            step: &plan.name,
            epochs: plan.budget.epochs,
            steps_per_epoch: plan.budget.steps_per_epoch,
            callback_count: self.dispatcher.len(),
        };
        started.log();
        let _guard = started.span("pipeline_step").entered();

        let report = EpochRunner::new(plan.name.clone(), plan.budget)
            .run(estimator.as_mut(), &mut self.dispatcher);
        self.dispatcher.clear();
        report
    }
}
