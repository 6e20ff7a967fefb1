// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;

use crate::callbacks::{Event, EventContext, Hook, HookBuilder, HookResult, ResultMap};
use crate::config::ConfigNode;
use crate::errors::ComponentError;
use crate::observability::messages::callback::StatsReported;
use crate::observability::messages::StructuredLog;
use crate::registry::Params;

pub const DEFAULT_INTERVAL: f64 = 0.2;

/// Key a step result may use to override the batch size its values were averaged over.
pub const BATCH_SIZE_KEY: &str = "N";

/// Running weighted average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AverageMeter {
    sum: f64,
    count: f64,
}

impl AverageMeter {
    pub fn update(&mut self, value: f64, n: f64) {
        self.sum += value * n;
        self.count += n;
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0.0 {
            0.0
        } else {
            self.sum / self.count
        }
    }

    pub fn count(&self) -> f64 {
        self.count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainPhase {
    Train,
    Valid,
}

impl TrainPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainPhase::Train => "train",
            TrainPhase::Valid => "valid",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            TrainPhase::Train => "Train",
            TrainPhase::Valid => "Valid",
        }
    }
}

/// Averages numeric step results per phase and logs them periodically.
///
/// `interval` below 1 is a share of the steps in an epoch, otherwise a step
/// count; `None` logs every step and `0` only the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerReporter {
    interval: Option<f64>,
    last_batch_size: f64,
    stats: IndexMap<&'static str, IndexMap<String, AverageMeter>>,
    last_report: Option<String>,
}

impl TrainerReporter {
    pub const PRIORITY: i32 = -1;

    pub fn new(interval: Option<f64>) -> Self {
        Self {
            interval,
            last_batch_size: 1.0,
            stats: IndexMap::new(),
            last_report: None,
        }
    }

    pub fn from_params(params: &Params) -> Result<Self, ComponentError> {
        let interval = match params.get("interval") {
            None => Some(DEFAULT_INTERVAL),
            Some(ConfigNode::Null) => None,
            Some(_) => params.optional::<f64>("interval")?,
        };
        if interval.map_or(false, |i| i < 0.0) {
            return Err(ComponentError::InvalidParam {
                name: "interval".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(Self::new(interval))
    }

    pub fn reset(&mut self) {
        self.stats.clear();
        self.last_batch_size = 1.0;
    }

    pub fn last_report(&self) -> Option<&str> {
        self.last_report.as_deref()
    }

    pub fn average(&self, phase: TrainPhase, key: &str) -> Option<f64> {
        self.stats
            .get(phase.as_str())
            .and_then(|stats| stats.get(key))
            .map(AverageMeter::avg)
    }

    pub fn on_loss(&mut self, ctx: &EventContext) {
        if let Some(batch_size) = ctx.get_f64("batch_size") {
            self.last_batch_size = batch_size;
        }
    }

    pub fn report_step(&mut self, phase: TrainPhase, result: &HookResult, ctx: &EventContext) {
        let step = ctx.get_usize("step").unwrap_or(0);
        let total_steps = ctx.get_usize("tot_steps").unwrap_or(0);
        if step >= total_steps {
            return;
        }
        if step == 0 {
            self.reset();
        }

        let interval = self.interval.map(|i| {
            if i > 0.0 && i < 1.0 {
                (i * total_steps as f64) as usize
            } else {
                i as usize
            }
        });

        let mut values: IndexMap<String, f64> = result
            .iter()
            .flatten()
            .filter_map(|(k, v)| match v {
                ConfigNode::Int(i) => Some((k.clone(), *i as f64)),
                ConfigNode::Float(x) => Some((k.clone(), *x)),
                _ => None,
            })
            .collect();
        let n = values
            .shift_remove(BATCH_SIZE_KEY)
            .unwrap_or(self.last_batch_size);

        if !values.is_empty() && !self.stats.contains_key(phase.as_str()) {
            self.stats.insert(phase.as_str(), IndexMap::new());
        }
        let Some(phase_stats) = self.stats.get_mut(phase.as_str()) else {
            return;
        };
        for (key, value) in values {
            phase_stats.entry(key).or_default().update(value, n);
        }

        let due = match interval {
            None => true,
            Some(0) => false,
            Some(every) => (step + 1) % every == 0,
        };
        if due || step + 1 == total_steps {
            let formatted = phase_stats
                .iter()
                .map(|(k, meter)| format!("{}: {:.4}", k, meter.avg()))
                .collect::<Vec<_>>()
                .join(" | ");
            StatsReported {
                phase: phase.title(),
                step: step + 1,
                total_steps,
                stats: &formatted,
            }
            .log();
            self.last_report = Some(formatted);
        }
    }

    /// Epoch averages, unless an earlier handler already produced a result.
    pub fn report_epoch(&mut self, phase: TrainPhase, result: HookResult) -> HookResult {
        let mut result = result.unwrap_or_default();
        if result.is_empty() {
            if let Some(phase_stats) = self.stats.get(phase.as_str()) {
                for (key, meter) in phase_stats {
                    result.insert(key.clone(), ConfigNode::Float(meter.avg()));
                }
            }
        }
        self.reset();
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn into_hook(self) -> Hook {
        HookBuilder::new("TrainerReporter", self)
            .priority(Self::PRIORITY)
            .on(Event::TrainerTrainStep.after(), |r, result, ctx| {
                r.report_step(TrainPhase::Train, &result, ctx);
                None
            })
            .on(Event::TrainerValidStep.after(), |r, result, ctx| {
                r.report_step(TrainPhase::Valid, &result, ctx);
                None
            })
            .on(Event::TrainerTrainEpoch.after(), |r, result, _| {
                r.report_epoch(TrainPhase::Train, result)
            })
            .on(Event::TrainerValidEpoch.after(), |r, result, _| {
                r.report_epoch(TrainPhase::Valid, result)
            })
            .on(Event::TrainerLoss.after(), |r, _, ctx| {
                r.on_loss(ctx);
                None
            })
            .build()
    }
}

impl Default for TrainerReporter {
    fn default() -> Self {
        Self::new(Some(DEFAULT_INTERVAL))
    }
}
