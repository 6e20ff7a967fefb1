// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The recursive configuration tree.
//!
//! A [`ConfigNode`] is a scalar, an ordered sequence of nodes, or an ordered
//! mapping from string keys to nodes. Mapping keys keep their insertion order
//! so a tree dumps back out exactly as it was read, but order plays no part in
//! merging (see [`crate::config::merge`]).
//!
//! Trees are built from any of the supported document formats:
//!
//! ```
//! use vega_orchestrator::config::ConfigNode;
//!
//! let node = ConfigNode::from_yaml_str("trainer:\n  epochs: 3\n  lr: 0.1\n").unwrap();
//! assert_eq!(node.get_path("trainer.epochs").and_then(|n| n.as_i64()), Some(3));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;

/// Ordered mapping node contents.
pub type Mapping = IndexMap<String, ConfigNode>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ConfigNode {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<ConfigNode>),
    Mapping(Mapping),
}

/// The shape of a node, used in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Integer => "integer",
            NodeKind::Float => "float",
            NodeKind::String => "string",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl ConfigNode {
    /// An empty mapping node.
    pub fn mapping() -> Self {
        ConfigNode::Mapping(Mapping::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ConfigNode::Null => NodeKind::Null,
            ConfigNode::Bool(_) => NodeKind::Bool,
            ConfigNode::Int(_) => NodeKind::Integer,
            ConfigNode::Float(_) => NodeKind::Float,
            ConfigNode::String(_) => NodeKind::String,
            ConfigNode::Sequence(_) => NodeKind::Sequence,
            ConfigNode::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigNode::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigNode::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigNode::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigNode::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of an integer or float node.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigNode::Int(i) => Some(*i as f64),
            ConfigNode::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Look up a direct child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Walk a dotted path such as `nas.trainer.callbacks.0`.
    ///
    /// Mapping segments match keys; sequence segments must be a numeric index.
    /// An empty path returns the node itself.
    pub fn get_path(&self, path: &str) -> Option<&ConfigNode> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| match node {
            ConfigNode::Mapping(map) => map.get(segment),
            ConfigNode::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
    }

    /// Copy of this node with the given top-level mapping keys removed.
    ///
    /// Non-mapping nodes are returned unchanged.
    pub fn without_keys(&self, keys: &[&str]) -> ConfigNode {
        match self {
            ConfigNode::Mapping(map) => ConfigNode::Mapping(
                map.iter()
                    .filter(|(key, _)| !keys.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<ConfigNode, ConfigError> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
                format: "yaml",
                reason: e.to_string(),
            })?;
        Ok(ConfigNode::from(value))
    }

    pub fn from_json_str(text: &str) -> Result<ConfigNode, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse {
                format: "json",
                reason: e.to_string(),
            })?;
        Ok(ConfigNode::from(value))
    }

    pub fn from_toml_str(text: &str) -> Result<ConfigNode, ConfigError> {
        let value: toml::Value = toml::from_str(text).map_err(|e| ConfigError::Parse {
            format: "toml",
            reason: e.to_string(),
        })?;
        Ok(ConfigNode::from(value))
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse {
            format: "yaml",
            reason: e.to_string(),
        })
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            format: "json",
            reason: e.to_string(),
        })
    }
}

/// Render a YAML mapping key as a string key.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<serde_yaml::Value> for ConfigNode {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => ConfigNode::Null,
            serde_yaml::Value::Bool(b) => ConfigNode::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigNode::Int(i),
                None => ConfigNode::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigNode::String(s),
            serde_yaml::Value::Sequence(items) => {
                ConfigNode::Sequence(items.into_iter().map(ConfigNode::from).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigNode::Mapping(
                map.into_iter()
                    .map(|(key, value)| (yaml_key(key), ConfigNode::from(value)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => ConfigNode::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for ConfigNode {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigNode::Null,
            serde_json::Value::Bool(b) => ConfigNode::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigNode::Int(i),
                None => ConfigNode::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ConfigNode::String(s),
            serde_json::Value::Array(items) => {
                ConfigNode::Sequence(items.into_iter().map(ConfigNode::from).collect())
            }
            serde_json::Value::Object(map) => ConfigNode::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigNode::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for ConfigNode {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigNode::String(s),
            toml::Value::Integer(i) => ConfigNode::Int(i),
            toml::Value::Float(x) => ConfigNode::Float(x),
            toml::Value::Boolean(b) => ConfigNode::Bool(b),
            toml::Value::Datetime(dt) => ConfigNode::String(dt.to_string()),
            toml::Value::Array(items) => {
                ConfigNode::Sequence(items.into_iter().map(ConfigNode::from).collect())
            }
            toml::Value::Table(table) => ConfigNode::Mapping(
                table
                    .into_iter()
                    .map(|(key, value)| (key, ConfigNode::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ConfigNode {
    fn from(b: bool) -> Self {
        ConfigNode::Bool(b)
    }
}

impl From<i64> for ConfigNode {
    fn from(i: i64) -> Self {
        ConfigNode::Int(i)
    }
}

impl From<i32> for ConfigNode {
    fn from(i: i32) -> Self {
        ConfigNode::Int(i64::from(i))
    }
}

impl From<usize> for ConfigNode {
    fn from(u: usize) -> Self {
        i64::try_from(u)
            .map(ConfigNode::Int)
            .unwrap_or(ConfigNode::Float(u as f64))
    }
}

impl From<f64> for ConfigNode {
    fn from(x: f64) -> Self {
        ConfigNode::Float(x)
    }
}

impl From<&str> for ConfigNode {
    fn from(s: &str) -> Self {
        ConfigNode::String(s.to_string())
    }
}

impl From<String> for ConfigNode {
    fn from(s: String) -> Self {
        ConfigNode::String(s)
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(items: Vec<ConfigNode>) -> Self {
        ConfigNode::Sequence(items)
    }
}

impl From<Mapping> for ConfigNode {
    fn from(map: Mapping) -> Self {
        ConfigNode::Mapping(map)
    }
}
