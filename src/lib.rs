// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod callbacks;     // hooks + priority dispatcher
pub mod config;        // config tree, merge, ref inheritance
pub mod engine;        // epoch runner + pipeline runner
pub mod errors;        // error handling
pub mod observability;
pub mod plugins;       // built-in callbacks and estimators
pub mod registry;      // lazy registry + class factory
pub mod traits;        // capability interfaces
