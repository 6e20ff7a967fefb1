// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its fixed level with structured fields.
//!
//! # Organization
//!
//! * `config` - Config loading, validation and reference resolution
//! * `registry` - Lazy registry and class factory events
//! * `callback` - Dispatcher and built-in callback events
//! * `pipeline` - Step and run lifecycle events
//!
//! # Usage Pattern
//!
//! ```rust
//! use vega_orchestrator::observability::messages::pipeline::StepStarted;
//! use vega_orchestrator::observability::messages::StructuredLog;
//!
//! let msg = StepStarted {
//!     step: "nas",
//!     epochs: 10,
//!     steps_per_epoch: 4,
//!     callback_count: 2,
//! };
//!
//! let span = msg.span("pipeline_step");
//! let _guard = span.enter();
//! msg.log();
//! ```

use tracing::Span;

pub mod callback;
pub mod config;
pub mod pipeline;
pub mod registry;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
