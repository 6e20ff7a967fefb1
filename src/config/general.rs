// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::node::ConfigNode;
use crate::errors::ConfigError;
use crate::registry::DuplicatePolicy;

/// Run-wide settings read from the `general` section.
///
/// # Example
/// ```yaml
/// general:
///   backend: mindspore     # or pytorch / tensorflow, short forms p / t / m
///   device_category: NPU   # GPU, NPU or CPU
///   registration: reject   # duplicate component policy, defaults to warn
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct General {
    pub backend: Backend,
    pub device_category: DeviceCategory,
    pub registration: DuplicatePolicy,
}

impl General {
    /// Read the typed settings from an optional `general` node.
    pub fn from_node(node: Option<&ConfigNode>) -> Result<Self, ConfigError> {
        let node = match node {
            None | Some(ConfigNode::Null) => return Ok(General::default()),
            Some(node) => node,
        };
        let value = serde_json::to_value(node).map_err(|e| ConfigError::General {
            reason: e.to_string(),
        })?;
        serde_json::from_value(value).map_err(|e| ConfigError::General {
            reason: e.to_string(),
        })
    }
}

/// Deep-learning backend the pipeline's plugins target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Backend {
    #[default]
    PyTorch,
    TensorFlow,
    MindSpore,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pytorch" | "p" => Ok(Backend::PyTorch),
            "tensorflow" | "t" => Ok(Backend::TensorFlow),
            "mindspore" | "m" => Ok(Backend::MindSpore),
            _ => Err(format!(
                "backend must be pytorch, tensorflow or mindspore, got '{}'",
                s
            )),
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Backend> for String {
    fn from(backend: Backend) -> Self {
        backend.to_string()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::PyTorch => "pytorch",
            Backend::TensorFlow => "tensorflow",
            Backend::MindSpore => "mindspore",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceCategory {
    #[default]
    Gpu,
    Npu,
    Cpu,
}

impl FromStr for DeviceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GPU" => Ok(DeviceCategory::Gpu),
            "NPU" => Ok(DeviceCategory::Npu),
            "CPU" => Ok(DeviceCategory::Cpu),
            _ => Err(format!("device_category must be GPU, NPU or CPU, got '{}'", s)),
        }
    }
}

impl TryFrom<String> for DeviceCategory {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DeviceCategory> for String {
    fn from(category: DeviceCategory) -> Self {
        category.to_string()
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceCategory::Gpu => "GPU",
            DeviceCategory::Npu => "NPU",
            DeviceCategory::Cpu => "CPU",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(text: &str) -> Result<General, ConfigError> {
        let node = ConfigNode::from_yaml_str(text).unwrap();
        General::from_node(Some(&node))
    }

    #[test]
    fn defaults_when_absent() {
        let general = General::from_node(None).unwrap();
        assert_eq!(general.backend, Backend::PyTorch);
        assert_eq!(general.device_category, DeviceCategory::Gpu);
        assert_eq!(general.registration, DuplicatePolicy::Warn);
    }

    #[test]
    fn short_backend_aliases() {
        assert_eq!(general("backend: m\n").unwrap().backend, Backend::MindSpore);
        assert_eq!(general("backend: t\n").unwrap().backend, Backend::TensorFlow);
        assert_eq!(general("backend: PyTorch\n").unwrap().backend, Backend::PyTorch);
    }

    #[test]
    fn device_category_is_case_insensitive() {
        assert_eq!(
            general("device_category: npu\n").unwrap().device_category,
            DeviceCategory::Npu
        );
    }

    #[test]
    fn registration_policy_is_read() {
        assert_eq!(
            general("registration: reject\n").unwrap().registration,
            DuplicatePolicy::Reject
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = general("backend: caffe\n").unwrap_err();
        assert!(err.to_string().contains("caffe"));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let general = general("backend: p\nparallel_search: true\n").unwrap();
        assert_eq!(general.backend, Backend::PyTorch);
    }
}
