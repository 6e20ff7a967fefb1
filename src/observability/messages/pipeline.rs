// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline and run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline start and completion
//! * Per-step setup (estimator, callbacks, budget)
//! * Terminal run states (stopped early vs completed)

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use vega_orchestrator::observability::messages::pipeline::PipelineStarted;
///
/// let msg = PipelineStarted {
///     backend: "pytorch",
///     device_category: "GPU",
///     step_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarted<'a> {
    pub backend: &'a str,
    pub device_category: &'a str,
    pub step_count: usize,
}

impl Display for PipelineStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline on {} ({}): {} steps",
            self.backend, self.device_category, self.step_count
        )
    }
}

impl StructuredLog for PipelineStarted<'_> {
    fn log(&self) {
        tracing::info!(
            backend = self.backend,
            device_category = self.device_category,
            step_count = self.step_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            backend = self.backend,
            device_category = self.device_category,
            step_count = self.step_count,
        )
    }
}

/// Pipeline execution completed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PipelineCompleted {
    pub step_count: usize,
    pub duration: std::time::Duration,
}

impl Display for PipelineCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline completed: {} steps in {:?}",
            self.step_count, self.duration
        )
    }
}

impl StructuredLog for PipelineCompleted {
    fn log(&self) {
        tracing::info!(
            step_count = self.step_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_completed",
            span_name = name,
            step_count = self.step_count,
            duration = ?self.duration,
        )
    }
}

/// Step execution started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StepStarted<'a> {
    pub step: &'a str,
    pub epochs: usize,
    pub steps_per_epoch: usize,
    pub callback_count: usize,
}

impl Display for StepStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting step '{}': {} epochs x {} steps, {} callbacks",
            self.step, self.epochs, self.steps_per_epoch, self.callback_count
        )
    }
}

impl StructuredLog for StepStarted<'_> {
    fn log(&self) {
        tracing::info!(
            step = self.step,
            epochs = self.epochs,
            steps_per_epoch = self.steps_per_epoch,
            callback_count = self.callback_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_step",
            span_name = name,
            step = self.step,
            epochs = self.epochs,
            steps_per_epoch = self.steps_per_epoch,
        )
    }
}

/// A run ended because a handler asked it to stop.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunStopped<'a> {
    pub step: &'a str,
    pub epoch: usize,
    pub total_epochs: usize,
}

impl Display for RunStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Step '{}' stopped early at epoch {} of {}",
            self.step, self.epoch, self.total_epochs
        )
    }
}

impl StructuredLog for RunStopped<'_> {
    fn log(&self) {
        tracing::info!(
            step = self.step,
            epoch = self.epoch,
            total_epochs = self.total_epochs,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("run_stopped", span_name = name, step = self.step)
    }
}

/// A run used its full epoch budget.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted<'a> {
    pub step: &'a str,
    pub epochs: usize,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Step '{}' completed {} epochs in {:?}",
            self.step, self.epochs, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            step = self.step,
            epochs = self.epochs,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            step = self.step,
            duration = ?self.duration,
        )
    }
}
