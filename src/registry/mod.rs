// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component registration and resolution.
//!
//! * [`LazyRegistry`] - `(namespace, short name)` to a module loaded on first use
//! * [`ClassFactory`] - `(category, name)` to an implementation, with
//!   instantiation from keyword [`Params`]
//! * [`RegistryContext`] - owns both; injectable, with a process-wide instance

pub mod category;
pub mod component;
pub mod context;
pub mod factory;
pub mod lazy;
pub mod module;

pub use category::Category;
pub use component::{
    Capability, ComponentFn, Constructor, Created, Implementation, Instance, Params, PartialFn,
};
pub use context::RegistryContext;
pub use factory::{ClassFactory, DuplicatePolicy, RegisterOutcome};
pub use lazy::{ExportName, LazyRegistry};
pub use module::{Module, ModuleExport, ModuleLoader, ModuleSource, StaticModules};
