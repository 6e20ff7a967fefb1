// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::callbacks::ResultMap;
use crate::errors::ComponentError;

/// A component the run loop can drive one step at a time.
///
/// The returned mapping is the step's output; it seeds the
/// `after:TrainerBase.train_step`, `after:EstimBase.step` and
/// `after:EstimBase.step_done` events. An estimator flags a new optimum by
/// setting `is_opt = true` in it. A `loss` entry is also passed to
/// `after:TrainerBase.loss` together with [`Estimator::batch_size`].
pub trait Estimator: Send {
    fn name(&self) -> &str;

    fn run_step(&mut self, epoch: usize, step: usize) -> Result<ResultMap, ComponentError>;

    /// Called once before the first epoch of a run.
    fn reset(&mut self) {}

    /// Samples per training step.
    fn batch_size(&self) -> usize {
        1
    }

    /// Validation steps run after each epoch's training steps; none by default.
    fn valid_steps(&self) -> usize {
        0
    }

    fn valid_step(&mut self, _epoch: usize, _step: usize) -> Result<ResultMap, ComponentError> {
        Ok(ResultMap::new())
    }
}
