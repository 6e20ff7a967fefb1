// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::config::NodeKind;

/// Structural violations found while validating a pipeline root config.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required top-level key is absent
    #[error("Required key '{key}' is missing")]
    MissingKey {
        /// The missing key
        key: String,
    },

    /// A key is present but holds the wrong kind of node
    #[error("Key '{key}' must be a {expected}, found {found}")]
    WrongType {
        /// The offending key (dotted or indexed path)
        key: String,
        /// The kind the rule requires
        expected: NodeKind,
        /// The kind actually found
        found: NodeKind,
    },

    /// `pipeline` lists a step that has no sibling config
    #[error("Pipeline step '{step}' is listed in 'pipeline' but has no config section")]
    MissingPipelineStep {
        /// The step name
        step: String,
    },
}

/// Errors raised while loading, validating, or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A `ref` path does not point at an existing node
    #[error("Reference '{path}' does not resolve to an existing node")]
    DanglingRef { path: String },

    /// A `ref` target still contains a `ref` of its own; only one hop is resolved
    #[error("Reference '{path}' points at a subtree that itself references '{inner}'; chained references are not resolved")]
    ChainedRef { path: String, inner: String },

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {format} config: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },

    #[error("Unsupported config file extension '{extension}' (expected yaml, yml, json or toml)")]
    UnsupportedFormat { extension: String },

    /// The `general` section does not match its typed schema
    #[error("Invalid 'general' section: {reason}")]
    General { reason: String },
}
