// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the lazy registry and class factory.
//!
//! This module contains message types for logging events related to:
//! * Deferred module registration and first-use resolution
//! * Component registration, overrides and rejected duplicates

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A namespace entry was recorded for deferred loading.
///
/// # Log Level
/// `debug!` - Detailed registration trace
pub struct LazyModuleRegistered<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub export_count: usize,
}

impl Display for LazyModuleRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered lazy module '{}.{}' with {} exports",
            self.namespace, self.name, self.export_count
        )
    }
}

impl StructuredLog for LazyModuleRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            namespace = self.namespace,
            name = self.name,
            export_count = self.export_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "lazy_register",
            span_name = name,
            namespace = self.namespace,
            module = self.name,
        )
    }
}

/// A deferred module was loaded on first use.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use vega_orchestrator::observability::messages::registry::ModuleResolved;
///
/// let msg = ModuleResolved {
///     namespace: "vega.callbacks.predefined",
///     name: "early_stopping",
///     export_count: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleResolved<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub export_count: usize,
}

impl Display for ModuleResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved module '{}.{}' ({} exports)",
            self.namespace, self.name, self.export_count
        )
    }
}

impl StructuredLog for ModuleResolved<'_> {
    fn log(&self) {
        tracing::info!(
            namespace = self.namespace,
            name = self.name,
            export_count = self.export_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "module_resolution",
            span_name = name,
            namespace = self.namespace,
            module = self.name,
        )
    }
}

/// A deferred module failed to load.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ModuleResolutionFailed<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to resolve module '{}.{}': {}",
            self.namespace, self.name, self.error
        )
    }
}

impl StructuredLog for ModuleResolutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            namespace = self.namespace,
            name = self.name,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "module_resolution_failed",
            span_name = name,
            namespace = self.namespace,
            module = self.name,
        )
    }
}

/// Component added to the class factory.
///
/// # Log Level
/// `debug!` - Detailed registration trace
pub struct ComponentRegistered<'a> {
    pub category: &'a str,
    pub name: &'a str,
}

impl Display for ComponentRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registered {} '{}'", self.category, self.name)
    }
}

impl StructuredLog for ComponentRegistered<'_> {
    fn log(&self) {
        tracing::debug!(category = self.category, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "component_registration",
            span_name = name,
            category = self.category,
            component = self.name,
        )
    }
}

/// A different implementation replaced an existing registration.
///
/// # Log Level
/// `warn!` - Benign but visible; last write wins
///
/// # Example
/// ```
/// use vega_orchestrator::observability::messages::registry::ComponentOverridden;
///
/// let msg = ComponentOverridden {
///     category: "metric",
///     name: "accuracy",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ComponentOverridden<'a> {
    pub category: &'a str,
    pub name: &'a str,
}

impl Display for ComponentOverridden<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Overriding {} '{}' with a different implementation",
            self.category, self.name
        )
    }
}

impl StructuredLog for ComponentOverridden<'_> {
    fn log(&self) {
        tracing::warn!(category = self.category, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "component_override",
            span_name = name,
            category = self.category,
            component = self.name,
        )
    }
}

/// Duplicate registration refused under the `reject` policy.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateRejected<'a> {
    pub category: &'a str,
    pub name: &'a str,
}

impl Display for DuplicateRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Refusing to replace {} '{}': duplicate registrations are rejected",
            self.category, self.name
        )
    }
}

impl StructuredLog for DuplicateRejected<'_> {
    fn log(&self) {
        tracing::error!(category = self.category, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "component_duplicate",
            span_name = name,
            category = self.category,
            component = self.name,
        )
    }
}
