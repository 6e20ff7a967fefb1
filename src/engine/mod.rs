// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod pipeline;
pub mod runner;

pub use pipeline::{ComponentSpec, PipelineReport, PipelineRunner, StepPlan};
pub use runner::{EpochRunner, RunBudget, RunOutcome, RunReport, RunState, STOP_KEY};
