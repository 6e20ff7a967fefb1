// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;

use crate::callbacks::ResultMap;
use crate::config::ConfigNode;
use crate::errors::ComponentError;
use crate::registry::Params;
use crate::traits::Estimator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptMode {
    Min,
    #[default]
    Max,
}

/// Replays a fixed list of values, one per step, holding the last one once exhausted.
///
/// Each step reports `value`, the best value so far as `best`, and
/// `is_opt = true` when `value` strictly improves on `best` under `mode`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEstimator {
    values: Vec<f64>,
    mode: OptMode,
    cursor: usize,
    best: Option<f64>,
}

impl ScheduledEstimator {
    pub fn new(values: Vec<f64>, mode: OptMode) -> Result<Self, ComponentError> {
        if values.is_empty() {
            return Err(ComponentError::InvalidParam {
                name: "values".to_string(),
                reason: "must list at least one value".to_string(),
            });
        }
        Ok(Self {
            values,
            mode,
            cursor: 0,
            best: None,
        })
    }

    pub fn from_params(params: &Params) -> Result<Self, ComponentError> {
        let values = params.required::<Vec<f64>>("values")?;
        let mode = params.optional::<OptMode>("mode")?.unwrap_or_default();
        Self::new(values, mode)
    }

    fn improves(&self, value: f64) -> bool {
        match (self.best, self.mode) {
            (None, _) => true,
            (Some(best), OptMode::Max) => value > best,
            (Some(best), OptMode::Min) => value < best,
        }
    }
}

impl Estimator for ScheduledEstimator {
    fn name(&self) -> &str {
        "ScheduledEstimator"
    }

    fn run_step(&mut self, _epoch: usize, _step: usize) -> Result<ResultMap, ComponentError> {
        let last = self.values.len() - 1;
        let value = self.values[self.cursor.min(last)];
        self.cursor += 1;

        let is_opt = self.improves(value);
        if is_opt {
            self.best = Some(value);
        }

        let mut out = ResultMap::new();
        out.insert("value".to_string(), ConfigNode::Float(value));
        if let Some(best) = self.best {
            out.insert("best".to_string(), ConfigNode::Float(best));
        }
        out.insert("is_opt".to_string(), ConfigNode::Bool(is_opt));
        Ok(out)
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.best = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::is_flag_set;

    fn opt_flags(estimator: &mut ScheduledEstimator, steps: usize) -> Vec<bool> {
        (0..steps)
            .map(|step| {
                let out = estimator.run_step(0, step).unwrap();
                is_flag_set(Some(&out), "is_opt")
            })
            .collect()
    }

    #[test]
    fn flags_improvements_by_mode() {
        struct TestCase {
            name: &'static str,
            mode: OptMode,
            values: Vec<f64>,
            expected: Vec<bool>,
        }

        let test_cases = vec![
            TestCase {
                name: "maximize",
                mode: OptMode::Max,
                values: vec![0.1, 0.3, 0.2, 0.4],
                expected: vec![true, true, false, true],
            },
            TestCase {
                name: "minimize",
                mode: OptMode::Min,
                values: vec![2.0, 1.0, 1.0, 3.0],
                expected: vec![true, true, false, false],
            },
            TestCase {
                name: "holds last value once exhausted",
                mode: OptMode::Max,
                values: vec![0.5],
                expected: vec![true, false, false],
            },
        ];

        for tc in test_cases {
            let mut estimator = ScheduledEstimator::new(tc.values, tc.mode).unwrap();
            let steps = tc.expected.len();
            assert_eq!(opt_flags(&mut estimator, steps), tc.expected, "{}", tc.name);
        }
    }

    #[test]
    fn reset_restarts_the_schedule() {
        let mut estimator = ScheduledEstimator::new(vec![1.0, 2.0], OptMode::Max).unwrap();
        opt_flags(&mut estimator, 2);
        estimator.reset();
        let out = estimator.run_step(0, 0).unwrap();
        assert_eq!(out.get("value"), Some(&ConfigNode::Float(1.0)));
        assert!(is_flag_set(Some(&out), "is_opt"));
    }

    #[test]
    fn from_params() {
        let params = Params::new()
            .with("values", vec![ConfigNode::Int(3), ConfigNode::Float(1.5)])
            .with("mode", "min");
        let estimator = ScheduledEstimator::from_params(&params).unwrap();
        assert_eq!(estimator.values, vec![3.0, 1.5]);
        assert_eq!(estimator.mode, OptMode::Min);

        assert!(matches!(
            ScheduledEstimator::from_params(&Params::new()),
            Err(ComponentError::MissingParam { .. })
        ));
        assert!(matches!(
            ScheduledEstimator::from_params(&Params::new().with("values", Vec::<ConfigNode>::new())),
            Err(ComponentError::InvalidParam { .. })
        ));
        assert!(matches!(
            ScheduledEstimator::from_params(
                &Params::new().with("values", vec![ConfigNode::Int(1)]).with("mode", "median")
            ),
            Err(ComponentError::InvalidParam { .. })
        ));
    }
}
