// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the orchestrator. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the human-readable text and structured fields
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::config` - Config loading, validation and `ref` resolution
//! * `messages::registry` - Lazy module resolution and component registration
//! * `messages::callback` - Hook registration and built-in callback reports
//! * `messages::pipeline` - Pipeline step and run lifecycle events
//!
//! # Usage
//!
//! ```rust
//! use vega_orchestrator::observability::messages::registry::ComponentOverridden;
//! use vega_orchestrator::observability::messages::StructuredLog;
//!
//! let msg = ComponentOverridden {
//!     category: "callback",
//!     name: "EarlyStopping",
//! };
//!
//! msg.log();
//! ```

pub mod messages;
