// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{GENERAL_KEY, PIPELINE_KEY, REF_KEY};
use crate::config::general::General;
use crate::config::node::ConfigNode;
use crate::config::reference::resolve_ref;
use crate::config::validation::{validate, ValidationRules};
use crate::errors::ConfigError;

/// Effective configuration of one pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    pub name: String,
    pub config: ConfigNode,
}

impl StepConfig {
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.config.get(key)
    }
}

/// A validated pipeline with every step's `ref` already resolved.
///
/// Built once per loaded document. Each [`StepConfig`] owns an independent
/// copy of its effective tree, so nothing a step does to its config can leak
/// into another step or back into the root.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    root: ConfigNode,
    general: General,
    steps: Vec<StepConfig>,
}

impl PipelineConfig {
    /// Validate `root` and resolve the refs of every listed step.
    ///
    /// Refs are resolved on the step node itself and on each of its direct
    /// mapping children (for example `nas.trainer`), always against the
    /// original root.
    pub fn from_node(root: ConfigNode) -> Result<Self, ConfigError> {
        validate(&root, &ValidationRules::pipeline_root())?;
        let general = General::from_node(root.get(GENERAL_KEY))?;

        let names: Vec<String> = root
            .get(PIPELINE_KEY)
            .and_then(ConfigNode::as_sequence)
            .unwrap_or_default()
            .iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect();

        let mut steps = Vec::with_capacity(names.len());
        for name in names {
            let node = root.get(&name).cloned().unwrap_or_else(ConfigNode::mapping);
            let config = resolve_step(&node, &root)?;
            steps.push(StepConfig { name, config });
        }

        Ok(Self {
            root,
            general,
            steps,
        })
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    /// Steps in pipeline order
    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&StepConfig> {
        self.steps.iter().find(|step| step.name == name)
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.name.as_str())
    }
}

/// Resolve the step's own items first, then the step-level `ref`.
///
/// Items inherited through the step-level `ref` are never resolved again; a
/// `ref` inside them is a [`ConfigError::ChainedRef`].
fn resolve_step(node: &ConfigNode, root: &ConfigNode) -> Result<ConfigNode, ConfigError> {
    let mut own = node.clone();
    if let Some(items) = own.as_mapping_mut() {
        for (key, item) in items.iter_mut() {
            if key.as_str() != REF_KEY && item.is_mapping() {
                *item = resolve_ref(item, root)?;
            }
        }
    }
    resolve_ref(&own, root)
}
