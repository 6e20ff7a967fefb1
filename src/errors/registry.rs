// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for lazy module resolution, component registration and construction.

use thiserror::Error;

use crate::registry::{Capability, Category};

/// Failure reported by a module source while loading a deferred module.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("No module named '{path}'")]
    ModuleNotFound { path: String },

    #[error("Module '{path}' failed to load: {reason}")]
    Failed { path: String, reason: String },

    #[error("Cannot import name '{name}' from '{path}'")]
    MissingExport { path: String, name: String },
}

/// Errors from the lazy registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The namespace/name pair was never lazily registered
    #[error("Nothing registered as '{name}' in namespace '{namespace}'")]
    NotFound { namespace: String, name: String },

    /// The deferred load raised
    #[error("Failed to import '{name}' from namespace '{namespace}': {source}")]
    ImportFailure {
        namespace: String,
        name: String,
        #[source]
        source: ImportError,
    },
}

/// Error a component constructor or function reports about its parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    #[error("Missing required parameter '{name}'")]
    MissingParam { name: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("{0}")]
    Failed(String),
}

/// Errors from the class factory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactoryError {
    #[error("Unknown component '{name}' in category '{category}'")]
    UnknownComponent { category: Category, name: String },

    /// Only raised under the `reject` duplicate policy
    #[error("Component '{name}' is already registered in category '{category}'")]
    DuplicateComponent { category: Category, name: String },

    #[error("Component '{name}' in category '{category}' must provide capability {expected}, found {found}")]
    CapabilityMismatch {
        category: Category,
        name: String,
        expected: Capability,
        found: Capability,
    },

    #[error("Failed to create '{name}' in category '{category}': {source}")]
    Construction {
        category: Category,
        name: String,
        #[source]
        source: ComponentError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
