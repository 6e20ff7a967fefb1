// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;

use crate::config::node::ConfigNode;
use crate::config::pipeline::PipelineConfig;
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigLoaded;
use crate::observability::messages::StructuredLog;

/// Document formats a pipeline config can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }

    pub fn parse(&self, text: &str) -> Result<ConfigNode, ConfigError> {
        match self {
            ConfigFormat::Yaml => ConfigNode::from_yaml_str(text),
            ConfigFormat::Json => ConfigNode::from_json_str(text),
            ConfigFormat::Toml => ConfigNode::from_toml_str(text),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
        }
    }
}

/// Load a raw config tree from a file, without validation
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConfigNode, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    let node = format.parse(&content)?;

    ConfigLoaded {
        path: &path.display().to_string(),
        format: format.as_str(),
    }
    .log();

    Ok(node)
}

/// Load a config file, validate it, and resolve every step's `ref`.
///
/// All configuration errors surface here, before any step runs.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let root = load_config(path)?;
    PipelineConfig::from_node(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use std::path::PathBuf;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "pipeline.yaml",
            r#"
general:
  backend: pytorch
pipeline: [nas, fully_train]
nas:
  epochs: 3
fully_train:
  ref: nas
  epochs: 10
"#,
        );

        let cfg = load_and_validate_config(&path).unwrap();
        assert_eq!(cfg.steps().len(), 2);
        assert_eq!(
            cfg.step("fully_train").unwrap().get("epochs"),
            Some(&ConfigNode::Int(10))
        );
    }

    #[test]
    fn test_load_and_validate_missing_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "broken.yml", "pipeline: [nas]\n");

        let err = load_and_validate_config(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::MissingPipelineStep { ref step }) if step == "nas"
        ));
    }

    #[test]
    fn json_and_toml_files_load() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(
            &dir,
            "pipeline.json",
            r#"{"pipeline": ["nas"], "nas": {"epochs": 2}}"#,
        );
        let toml = write(&dir, "pipeline.toml", "pipeline = [\"nas\"]\n[nas]\nepochs = 2\n");

        let from_json = load_and_validate_config(&json).unwrap();
        let from_toml = load_and_validate_config(&toml).unwrap();
        assert_eq!(from_json.steps(), from_toml.steps());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "pipeline.ini", "pipeline=nas\n");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { ref extension } if extension == "ini"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
