// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised when an event key string is bound to a hook.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The key does not follow `<before|after>:<Source>.<name>`
    #[error("Malformed event key '{key}': {reason}")]
    MalformedEventKey { key: String, reason: &'static str },

    /// The key is well formed but names no known event
    #[error("Unknown event '{key}'")]
    UnknownEvent { key: String },
}
