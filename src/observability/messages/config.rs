// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration events.
//!
//! This module contains message types for logging events related to:
//! * Config document loading
//! * Structural validation failures
//! * `ref` inheritance between steps

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Config document read and parsed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use vega_orchestrator::observability::messages::config::ConfigLoaded;
///
/// let msg = ConfigLoaded {
///     path: "configs/nas.yaml",
///     format: "yaml",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub format: &'a str,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded {} config from '{}'", self.format, self.path)
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(path = self.path, format = self.format, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_load",
            span_name = name,
            path = self.path,
            format = self.format,
        )
    }
}

/// Root config rejected by validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed<'a> {
    pub error: &'a ValidationError,
}

impl Display for ValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Configuration rejected: {}", self.error)
    }
}

impl StructuredLog for ValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "config_validation",
            span_name = name,
            error = %self.error,
        )
    }
}

/// A `ref` was resolved into an effective node.
///
/// # Log Level
/// `debug!` - Detailed resolution trace
pub struct RefResolved<'a> {
    pub path: &'a str,
    pub inherited_keys: usize,
    pub own_keys: usize,
}

impl Display for RefResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved ref '{}': {} inherited keys, {} own keys",
            self.path, self.inherited_keys, self.own_keys
        )
    }
}

impl StructuredLog for RefResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            path = self.path,
            inherited_keys = self.inherited_keys,
            own_keys = self.own_keys,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("ref_resolution", span_name = name, path = self.path)
    }
}
