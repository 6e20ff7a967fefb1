// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Callbacks shipped with the orchestrator.

pub mod early_stopping;
pub mod trainer_reporter;

pub use early_stopping::EarlyStopping;
pub use trainer_reporter::{AverageMeter, TrainPhase, TrainerReporter};
