// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{ComponentError, ConfigError, FactoryError};

/// Errors raised while executing pipeline steps.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Step '{step}' failed at epoch {epoch}, step {batch}: {source}")]
    Estimator {
        step: String,
        epoch: usize,
        batch: usize,
        #[source]
        source: ComponentError,
    },

    #[error("Step '{step}' is misconfigured: {reason}")]
    StepConfig { step: String, reason: String },

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
