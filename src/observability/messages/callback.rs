// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the callback dispatcher and built-in callbacks.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Hook inserted into the dispatcher.
///
/// # Log Level
/// `debug!` - Detailed dispatch trace
pub struct HookRegistered<'a> {
    pub hook: &'a str,
    pub priority: i32,
    pub binding_count: usize,
}

impl Display for HookRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered hook '{}' (priority {}, {} bindings)",
            self.hook, self.priority, self.binding_count
        )
    }
}

impl StructuredLog for HookRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            hook = self.hook,
            priority = self.priority,
            binding_count = self.binding_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("hook_registration", span_name = name, hook = self.hook)
    }
}

/// Early stopping tripped after too many epochs without improvement.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use vega_orchestrator::observability::messages::callback::EarlyStopped;
///
/// let msg = EarlyStopped {
///     epochs_without_improvement: 3,
///     threshold: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EarlyStopped {
    pub epochs_without_improvement: i64,
    pub threshold: i64,
}

impl Display for EarlyStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Early stopped: {} epochs without improvement (threshold {})",
            self.epochs_without_improvement, self.threshold
        )
    }
}

impl StructuredLog for EarlyStopped {
    fn log(&self) {
        tracing::info!(
            epochs_without_improvement = self.epochs_without_improvement,
            threshold = self.threshold,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "early_stopping",
            span_name = name,
            threshold = self.threshold,
        )
    }
}

/// Running statistics for one phase of training.
///
/// # Log Level
/// `info!` - Periodic progress report
pub struct StatsReported<'a> {
    pub phase: &'a str,
    pub step: usize,
    pub total_steps: usize,
    pub stats: &'a str,
}

impl Display for StatsReported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: [{:3}/{}] {}",
            self.phase, self.step, self.total_steps, self.stats
        )
    }
}

impl StructuredLog for StatsReported<'_> {
    fn log(&self) {
        tracing::info!(
            phase = self.phase,
            step = self.step,
            total_steps = self.total_steps,
            stats = self.stats,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("trainer_report", span_name = name, phase = self.phase)
    }
}
