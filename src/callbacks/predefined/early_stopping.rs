// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::callbacks::{is_flag_set, Event, Hook, HookBuilder, HookResult};
use crate::config::ConfigNode;
use crate::errors::ComponentError;
use crate::observability::messages::callback::EarlyStopped;
use crate::observability::messages::StructuredLog;
use crate::registry::Params;

pub const DEFAULT_THRESHOLD: i64 = 10;

/// Stops a run after `threshold` consecutive epochs without an optimum.
///
/// An epoch counts as improving when any `after:EstimBase.step_done` result
/// in it carried `is_opt = true`. When the counter reaches the threshold the
/// `after:EstimBase.run_epoch` result gets `stop = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyStopping {
    threshold: i64,
    last_opt: i64,
    stop: bool,
}

impl EarlyStopping {
    pub const PRIORITY: i32 = -10;

    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            last_opt: -1,
            stop: false,
        }
    }

    pub fn from_params(params: &Params) -> Result<Self, ComponentError> {
        let threshold = params.optional::<i64>("threshold")?.unwrap_or(DEFAULT_THRESHOLD);
        if threshold < 0 {
            return Err(ComponentError::InvalidParam {
                name: "threshold".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(Self::new(threshold))
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Epochs since the last optimum, zero-based; `-1` before the first epoch.
    pub fn epochs_without_improvement(&self) -> i64 {
        self.last_opt
    }

    pub fn stopped(&self) -> bool {
        self.stop
    }

    pub fn reset(&mut self) {
        self.last_opt = -1;
        self.stop = false;
    }

    pub fn on_step_done(&mut self, result: HookResult) -> HookResult {
        let result = result.unwrap_or_default();
        if is_flag_set(Some(&result), "is_opt") {
            self.last_opt = -1;
        }
        Some(result)
    }

    pub fn on_epoch(&mut self, result: HookResult) -> HookResult {
        self.last_opt += 1;
        if self.last_opt < self.threshold {
            return result;
        }

        EarlyStopped {
            epochs_without_improvement: self.last_opt,
            threshold: self.threshold,
        }
        .log();
        self.stop = true;
        let mut result = result.unwrap_or_default();
        result.insert("stop".to_string(), ConfigNode::Bool(true));
        Some(result)
    }

    pub fn into_hook(self) -> Hook {
        HookBuilder::new("EarlyStopping", self)
            .priority(Self::PRIORITY)
            .on(Event::EstimRun.before(), |es, _, _| {
                es.reset();
                None
            })
            .on(Event::EstimStepDone.after(), |es, result, _| es.on_step_done(result))
            .on(Event::EstimRunEpoch.after(), |es, result, _| es.on_epoch(result))
            .build()
    }
}

impl Default for EarlyStopping {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
