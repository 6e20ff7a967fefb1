// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod dispatch;
mod registry;
mod run;

pub use config::{ConfigError, ValidationError};
pub use dispatch::DispatchError;
pub use registry::{ComponentError, FactoryError, ImportError, RegistryError};
pub use run::RunError;
