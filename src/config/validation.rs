// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of a pipeline root config.
//!
//! Validation runs before any ref is resolved or any step executes, so a
//! broken document fails fast at load time instead of mid-run.
//!
//! # Validation Pipeline
//!
//! 1. **Root shape**: the document must be a mapping
//! 2. **Key rules**: every rule in [`ValidationRules`] is checked for presence
//!    (`required`) and node kind
//! 3. **Step presence**: every name listed in `pipeline` must be a string and
//!    must exist as a sibling mapping at the root
//!
//! The first violation is returned; each one is also logged as a structured
//! event.
//!
//! # Examples
//!
//! ```rust
//! use vega_orchestrator::config::{validate, ConfigNode, ValidationRules};
//!
//! let root = ConfigNode::from_yaml_str("pipeline: [nas]\nnas: {epochs: 1}\n").unwrap();
//! assert!(validate(&root, &ValidationRules::pipeline_root()).is_ok());
//!
//! let broken = ConfigNode::from_yaml_str("pipeline: [nas, fully_train]\nnas: {}\n").unwrap();
//! let err = validate(&broken, &ValidationRules::pipeline_root()).unwrap_err();
//! assert!(err.to_string().contains("fully_train"));
//! ```

use indexmap::IndexMap;

use crate::config::consts::{GENERAL_KEY, PIPELINE_KEY};
use crate::config::node::{ConfigNode, NodeKind};
use crate::errors::ValidationError;
use crate::observability::messages::config::ValidationFailed;
use crate::observability::messages::StructuredLog;

/// Requirement attached to one top-level key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRule {
    pub required: bool,
    pub kind: Option<NodeKind>,
}

impl KeyRule {
    pub fn required(kind: NodeKind) -> Self {
        Self {
            required: true,
            kind: Some(kind),
        }
    }

    pub fn optional(kind: NodeKind) -> Self {
        Self {
            required: false,
            kind: Some(kind),
        }
    }
}

/// Top-level key rules, checked in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    rules: IndexMap<String, KeyRule>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pipeline` is a required sequence, `general` an optional mapping.
    pub fn pipeline_root() -> Self {
        Self::new()
            .with_rule(GENERAL_KEY, KeyRule::optional(NodeKind::Mapping))
            .with_rule(PIPELINE_KEY, KeyRule::required(NodeKind::Sequence))
    }

    pub fn with_rule(mut self, key: impl Into<String>, rule: KeyRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &KeyRule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }
}

/// Validate a root config against `rules` and the pipeline step invariant.
pub fn validate(root: &ConfigNode, rules: &ValidationRules) -> Result<(), ValidationError> {
    check(root, rules).map_err(|error| {
        ValidationFailed { error: &error }.log();
        error
    })
}

fn check(root: &ConfigNode, rules: &ValidationRules) -> Result<(), ValidationError> {
    let map = root.as_mapping().ok_or(ValidationError::WrongType {
        key: "<root>".to_string(),
        expected: NodeKind::Mapping,
        found: root.kind(),
    })?;

    for (key, rule) in rules.rules() {
        match map.get(key) {
            // an explicit null on an optional key reads as "not set"
            None | Some(ConfigNode::Null) if !rule.required => {}
            None => {
                return Err(ValidationError::MissingKey {
                    key: key.to_string(),
                })
            }
            Some(node) => {
                if let Some(expected) = rule.kind {
                    if node.kind() != expected {
                        return Err(ValidationError::WrongType {
                            key: key.to_string(),
                            expected,
                            found: node.kind(),
                        });
                    }
                }
            }
        }
    }

    let steps = match map.get(PIPELINE_KEY).and_then(ConfigNode::as_sequence) {
        Some(steps) => steps,
        None => return Ok(()),
    };

    for (index, step) in steps.iter().enumerate() {
        let name = step.as_str().ok_or_else(|| ValidationError::WrongType {
            key: format!("{}[{}]", PIPELINE_KEY, index),
            expected: NodeKind::String,
            found: step.kind(),
        })?;
        match map.get(name) {
            None => {
                return Err(ValidationError::MissingPipelineStep {
                    step: name.to_string(),
                })
            }
            Some(node) if !node.is_mapping() => {
                return Err(ValidationError::WrongType {
                    key: name.to_string(),
                    expected: NodeKind::Mapping,
                    found: node.kind(),
                })
            }
            Some(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> ConfigNode {
        ConfigNode::from_yaml_str(text).unwrap()
    }

    #[test]
    fn test_validate_table_driven() {
        struct TestCase {
            name: &'static str,
            document: &'static str,
            expected: Result<(), ValidationError>,
        }

        let test_cases = vec![
            TestCase {
                name: "minimal valid pipeline",
                document: "pipeline: [nas]\nnas: {}\n",
                expected: Ok(()),
            },
            TestCase {
                name: "general present as mapping",
                document: "general: {backend: pytorch}\npipeline: [nas]\nnas: {}\n",
                expected: Ok(()),
            },
            TestCase {
                name: "null general is treated as absent",
                document: "general:\npipeline: [nas]\nnas: {}\n",
                expected: Ok(()),
            },
            TestCase {
                name: "missing pipeline",
                document: "general: {}\nnas: {}\n",
                expected: Err(ValidationError::MissingKey {
                    key: "pipeline".to_string(),
                }),
            },
            TestCase {
                name: "pipeline is not a sequence",
                document: "pipeline: nas\nnas: {}\n",
                expected: Err(ValidationError::WrongType {
                    key: "pipeline".to_string(),
                    expected: NodeKind::Sequence,
                    found: NodeKind::String,
                }),
            },
            TestCase {
                name: "general is not a mapping",
                document: "general: [1]\npipeline: []\n",
                expected: Err(ValidationError::WrongType {
                    key: "general".to_string(),
                    expected: NodeKind::Mapping,
                    found: NodeKind::Sequence,
                }),
            },
            TestCase {
                name: "listed step absent",
                document: "pipeline: [nas, fully_train]\nnas: {}\n",
                expected: Err(ValidationError::MissingPipelineStep {
                    step: "fully_train".to_string(),
                }),
            },
            TestCase {
                name: "step name is not a string",
                document: "pipeline: [nas, 3]\nnas: {}\n",
                expected: Err(ValidationError::WrongType {
                    key: "pipeline[1]".to_string(),
                    expected: NodeKind::String,
                    found: NodeKind::Integer,
                }),
            },
            TestCase {
                name: "null step section is not an empty step",
                document: "pipeline: [nas]\nnas:\n",
                expected: Err(ValidationError::WrongType {
                    key: "nas".to_string(),
                    expected: NodeKind::Mapping,
                    found: NodeKind::Null,
                }),
            },
            TestCase {
                name: "step config is not a mapping",
                document: "pipeline: [nas]\nnas: 5\n",
                expected: Err(ValidationError::WrongType {
                    key: "nas".to_string(),
                    expected: NodeKind::Mapping,
                    found: NodeKind::Integer,
                }),
            },
        ];

        for test_case in test_cases {
            let result = validate(&yaml(test_case.document), &ValidationRules::pipeline_root());
            assert_eq!(
                result, test_case.expected,
                "Test case '{}' produced an unexpected result",
                test_case.name
            );
        }
    }

    #[test]
    fn root_must_be_a_mapping() {
        let err = validate(&yaml("- a\n- b\n"), &ValidationRules::pipeline_root()).unwrap_err();
        assert!(matches!(err, ValidationError::WrongType { ref key, .. } if key == "<root>"));
    }

    #[test]
    fn missing_step_error_names_the_step() {
        let err = validate(
            &yaml("pipeline: [search]\n"),
            &ValidationRules::pipeline_root(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'search'"));
    }

    #[test]
    fn custom_rules_extend_the_defaults() {
        let rules = ValidationRules::pipeline_root()
            .with_rule("project", KeyRule::required(NodeKind::String));
        let err = validate(&yaml("pipeline: []\n"), &rules).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingKey {
                key: "project".to_string()
            }
        );
        assert!(validate(&yaml("pipeline: []\nproject: demo\n"), &rules).is_ok());
    }
}
