// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod general;
mod loader;
mod merge;
mod node;
mod pipeline;
mod reference;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use general::{Backend, DeviceCategory, General};
pub use loader::{load_and_validate_config, load_config, ConfigFormat};
pub use merge::merge;
pub use node::{ConfigNode, Mapping, NodeKind};
pub use pipeline::{PipelineConfig, StepConfig};
pub use reference::resolve_ref;
pub use validation::{validate, KeyRule, ValidationRules};
