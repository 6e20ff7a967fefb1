// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::{Duration, Instant};

use crate::callbacks::{is_flag_set, Dispatcher, Event, EventContext, HookResult, ResultMap};
use crate::config::ConfigNode;
use crate::errors::RunError;
use crate::observability::messages::pipeline::{RunCompleted, RunStopped};
use crate::observability::messages::StructuredLog;
use crate::traits::Estimator;

/// Result key a handler sets on `after:EstimBase.run_epoch` to end the run.
pub const STOP_KEY: &str = "stop";
/// Step output key forwarded to `after:TrainerBase.loss`.
pub const LOSS_KEY: &str = "loss";
/// Key the validation epoch result is filed under in the `run_epoch` seed.
pub const VALID_KEY: &str = "valid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBudget {
    pub epochs: usize,
    pub steps_per_epoch: usize,
}

/// `Init -> Running -> (Stopped | Completed)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Running,
    Stopped,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A handler set `stop` at the end of this (zero-based) epoch
    Stopped { epoch: usize },
    /// The whole epoch budget ran
    Completed { epochs: usize },
}

impl RunOutcome {
    pub fn is_stopped(&self) -> bool {
        matches!(self, RunOutcome::Stopped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub step: String,
    pub budget: RunBudget,
    pub outcome: RunOutcome,
    pub state: RunState,
    /// What the last `after:EstimBase.run_epoch` dispatch returned
    pub last_epoch_result: HookResult,
    pub duration: Duration,
}

/// Drives one estimator through its epoch budget, firing lifecycle events.
///
/// Per step: `before:EstimBase.step`, the estimator's `run_step`,
/// `after:TrainerBase.loss` (with `batch_size` in the context), then
/// `after:TrainerBase.train_step`, `after:EstimBase.step` and
/// `after:EstimBase.step_done`, each seeded with what the previous one
/// returned. Per epoch, `after:TrainerBase.train_epoch` feeds
/// `after:EstimBase.run_epoch`, whose result is checked for [`STOP_KEY`].
/// Estimators with validation steps get `after:TrainerBase.valid_step` per
/// step and `after:TrainerBase.valid_epoch` before `run_epoch`; a non-empty
/// validation result is filed under [`VALID_KEY`].
pub struct EpochRunner {
    step: String,
    budget: RunBudget,
    state: RunState,
}

impl EpochRunner {
    pub fn new(step: impl Into<String>, budget: RunBudget) -> Self {
        Self {
            step: step.into(),
            budget,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn run(
        &mut self,
        estimator: &mut dyn Estimator,
        dispatcher: &mut Dispatcher,
    ) -> Result<RunReport, RunError> {
        let started = Instant::now();
        let tot_epochs = self.budget.epochs;
        let tot_steps = self.budget.steps_per_epoch;
        let run_ctx = EventContext::new()
            .with("estimator", estimator.name())
            .with("tot_epochs", tot_epochs);

        dispatcher.fire(&Event::EstimRun.before(), &run_ctx, None);
        estimator.reset();
        self.state = RunState::Running;

        let mut outcome = RunOutcome::Completed { epochs: tot_epochs };
        let mut last_epoch_result = None;

        for epoch in 0..tot_epochs {
            let epoch_ctx = EventContext::new()
                .with("epoch", epoch)
                .with("tot_epochs", tot_epochs);
            dispatcher.fire(&Event::EstimRunEpoch.before(), &epoch_ctx, None);

            for step in 0..tot_steps {
                self.run_step(estimator, dispatcher, epoch, step)?;
            }

            let mut trained = dispatcher.fire(&Event::TrainerTrainEpoch.after(), &epoch_ctx, None);
            if let Some(validated) = self.run_valid(estimator, dispatcher, epoch)? {
                trained
                    .get_or_insert_with(ResultMap::new)
                    .insert(VALID_KEY.to_string(), ConfigNode::Mapping(validated));
            }
            let result = dispatcher.fire(&Event::EstimRunEpoch.after(), &epoch_ctx, trained);
            let stop = is_flag_set(result.as_ref(), STOP_KEY);
            last_epoch_result = result;
            if stop {
                outcome = RunOutcome::Stopped { epoch };
                break;
            }
        }

        dispatcher.fire(&Event::EstimRun.after(), &run_ctx, last_epoch_result.clone());

        let duration = started.elapsed();
        match outcome {
            RunOutcome::Stopped { epoch } => {
                self.state = RunState::Stopped;
                RunStopped {
                    step: &self.step,
                    epoch: epoch + 1,
                    total_epochs: tot_epochs,
                }
                .log();
            }
            RunOutcome::Completed { epochs } => {
                self.state = RunState::Completed;
                RunCompleted {
                    step: &self.step,
                    epochs,
                    duration,
                }
                .log();
            }
        }

        Ok(RunReport {
            step: self.step.clone(),
            budget: self.budget,
            outcome,
            state: self.state,
            last_epoch_result,
            duration,
        })
    }

    fn run_step(
        &self,
        estimator: &mut dyn Estimator,
        dispatcher: &mut Dispatcher,
        epoch: usize,
        step: usize,
    ) -> Result<(), RunError> {
        let ctx = EventContext::new()
            .with("epoch", epoch)
            .with("tot_epochs", self.budget.epochs)
            .with("step", step)
            .with("tot_steps", self.budget.steps_per_epoch);

        dispatcher.fire(&Event::EstimStep.before(), &ctx, None);
        let output: ResultMap =
            estimator
                .run_step(epoch, step)
                .map_err(|source| RunError::Estimator {
                    step: self.step.clone(),
                    epoch,
                    batch: step,
                    source,
                })?;

        let loss = output.get(LOSS_KEY).map(|loss| {
            let mut seed = ResultMap::new();
            seed.insert(LOSS_KEY.to_string(), loss.clone());
            seed
        });
        let loss_ctx = ctx.clone().with("batch_size", estimator.batch_size());
        dispatcher.fire(&Event::TrainerLoss.after(), &loss_ctx, loss);

        let trained = dispatcher.fire(&Event::TrainerTrainStep.after(), &ctx, Some(output));
        let stepped = dispatcher.fire(&Event::EstimStep.after(), &ctx, trained);
        dispatcher.fire(&Event::EstimStepDone.after(), &ctx, stepped);
        Ok(())
    }

    fn run_valid(
        &self,
        estimator: &mut dyn Estimator,
        dispatcher: &mut Dispatcher,
        epoch: usize,
    ) -> Result<HookResult, RunError> {
        let tot_steps = estimator.valid_steps();
        if tot_steps == 0 {
            return Ok(None);
        }

        for step in 0..tot_steps {
            let ctx = EventContext::new()
                .with("epoch", epoch)
                .with("step", step)
                .with("tot_steps", tot_steps);
            let output =
                estimator
                    .valid_step(epoch, step)
                    .map_err(|source| RunError::Estimator {
                        step: self.step.clone(),
                        epoch,
                        batch: step,
                        source,
                    })?;
            dispatcher.fire(&Event::TrainerValidStep.after(), &ctx, Some(output));
        }

        let epoch_ctx = EventContext::new().with("epoch", epoch);
        let validated = dispatcher.fire(&Event::TrainerValidEpoch.after(), &epoch_ctx, None);
        Ok(validated.filter(|result| !result.is_empty()))
    }
}
