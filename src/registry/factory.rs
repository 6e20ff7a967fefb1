// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The class factory: `(category, name) -> implementation`.
//!
//! Registration is eager ([`ClassFactory::register`]) or lazy, through the
//! shared [`LazyRegistry`]. A lookup miss asks the lazy registry for a module
//! declaring the name, loads it and registers those of its exports that are
//! not registered yet before retrying, so plugin modules cost nothing until
//! one of their components is first requested. A lazy load never replaces an
//! existing registration.

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::category::Category;
use super::component::{Capability, Created, Implementation, Instance, Params, PartialFn};
use super::lazy::LazyRegistry;
use super::module::Module;
use crate::errors::FactoryError;
use crate::observability::messages::registry::{
    ComponentOverridden, ComponentRegistered, DuplicateRejected,
};
use crate::observability::messages::StructuredLog;

/// What to do when a different implementation is registered under a taken name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last write wins, with a warning
    #[default]
    Warn,
    /// Fail with [`FactoryError::DuplicateComponent`]
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Inserted,
    /// The same implementation was already registered
    Unchanged,
    Overridden,
}

pub struct ClassFactory {
    entries: RwLock<HashMap<Category, IndexMap<String, Implementation>>>,
    aliases: RwLock<HashMap<Category, HashMap<String, String>>>,
    policy: RwLock<DuplicatePolicy>,
    lazy: Arc<LazyRegistry>,
    imported: Mutex<HashSet<String>>,
}

impl ClassFactory {
    pub fn new(lazy: Arc<LazyRegistry>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            aliases: RwLock::new(HashMap::new()),
            policy: RwLock::new(DuplicatePolicy::default()),
            lazy,
            imported: Mutex::new(HashSet::new()),
        }
    }

    pub fn lazy(&self) -> &LazyRegistry {
        &self.lazy
    }

    pub fn policy(&self) -> DuplicatePolicy {
        *self.policy.read()
    }

    pub fn set_policy(&self, policy: DuplicatePolicy) {
        *self.policy.write() = policy;
    }

    /// Register `implementation` as `name` in `category`.
    ///
    /// Re-registering the identical implementation is a no-op. A different
    /// implementation overrides with a warning, or fails under
    /// [`DuplicatePolicy::Reject`].
    pub fn register(
        &self,
        category: &Category,
        name: &str,
        implementation: Implementation,
    ) -> Result<RegisterOutcome, FactoryError> {
        if let Some(expected) = category.required_capability() {
            let found = implementation.capability();
            if found != expected {
                return Err(FactoryError::CapabilityMismatch {
                    category: category.clone(),
                    name: name.to_string(),
                    expected,
                    found,
                });
            }
        }

        let mut entries = self.entries.write();
        let names = entries.entry(category.clone()).or_default();

        let outcome = match names.get(name) {
            Some(existing) if existing.same_as(&implementation) => RegisterOutcome::Unchanged,
            Some(_) => match self.policy() {
                DuplicatePolicy::Reject => {
                    DuplicateRejected {
                        category: category.as_str(),
                        name,
                    }
                    .log();
                    return Err(FactoryError::DuplicateComponent {
                        category: category.clone(),
                        name: name.to_string(),
                    });
                }
                DuplicatePolicy::Warn => {
                    ComponentOverridden {
                        category: category.as_str(),
                        name,
                    }
                    .log();
                    RegisterOutcome::Overridden
                }
            },
            None => {
                ComponentRegistered {
                    category: category.as_str(),
                    name,
                }
                .log();
                RegisterOutcome::Inserted
            }
        };

        if outcome != RegisterOutcome::Unchanged {
            names.insert(name.to_string(), implementation);
        }
        Ok(outcome)
    }

    /// Register under `name` and make every alias resolve to it.
    pub fn register_with_aliases(
        &self,
        category: &Category,
        name: &str,
        aliases: &[&str],
        implementation: Implementation,
    ) -> Result<RegisterOutcome, FactoryError> {
        let outcome = self.register(category, name, implementation)?;
        for alias in aliases {
            self.register_alias(category, alias, name);
        }
        Ok(outcome)
    }

    pub fn register_alias(&self, category: &Category, alias: &str, target: &str) {
        self.aliases
            .write()
            .entry(category.clone())
            .or_default()
            .insert(alias.to_string(), target.to_string());
    }

    /// Register every export of an already loaded module.
    pub fn register_module(&self, module: &Module) -> Result<(), FactoryError> {
        for export in module.exports() {
            self.register(&export.category, &export.name, export.implementation.clone())?;
        }
        Ok(())
    }

    /// Look up an implementation, loading a lazily registered provider on a miss.
    pub fn get(&self, category: &Category, name: &str) -> Result<Implementation, FactoryError> {
        let name = self.canonical(category, name);
        if let Some(implementation) = self.lookup(category, &name) {
            return Ok(implementation);
        }

        if let Some((namespace, short)) = self.lazy.find_provider(category, &name) {
            let module = self.lazy.resolve(&namespace, &short)?;
            let mut imported = self.imported.lock();
            if imported.insert(module.path().to_string()) {
                self.register_missing_exports(&module)?;
            }
            drop(imported);

            if let Some(implementation) = self.lookup(category, &name) {
                return Ok(implementation);
            }
        }

        Err(FactoryError::UnknownComponent {
            category: category.clone(),
            name,
        })
    }

    /// Instantiate a class with `params`, or bind `params` into a function.
    pub fn create(
        &self,
        category: &Category,
        name: &str,
        params: Params,
    ) -> Result<Created, FactoryError> {
        match self.get(category, name)? {
            Implementation::Class(constructor) => {
                let instance =
                    constructor
                        .construct(&params)
                        .map_err(|source| FactoryError::Construction {
                            category: category.clone(),
                            name: name.to_string(),
                            source,
                        })?;
                if let Some(expected) = category.required_capability() {
                    let found = instance.capability();
                    if found != expected {
                        return Err(FactoryError::CapabilityMismatch {
                            category: category.clone(),
                            name: name.to_string(),
                            expected,
                            found,
                        });
                    }
                }
                Ok(Created::Instance(instance))
            }
            Implementation::Function(func) => Ok(Created::Partial(PartialFn::new(func, params))),
        }
    }

    /// [`create`](Self::create) for callers that need a constructed instance.
    pub fn create_instance(
        &self,
        category: &Category,
        name: &str,
        params: Params,
    ) -> Result<Instance, FactoryError> {
        match self.create(category, name, params)? {
            Created::Instance(instance) => Ok(instance),
            Created::Partial(_) => Err(FactoryError::CapabilityMismatch {
                category: category.clone(),
                name: name.to_string(),
                expected: category.required_capability().unwrap_or(Capability::Generic),
                found: Capability::Function,
            }),
        }
    }

    /// True if `name` (or an alias of it) is eagerly registered in `category`.
    pub fn is_registered(&self, category: &Category, name: &str) -> bool {
        let name = self.canonical(category, name);
        self.lookup(category, &name).is_some()
    }

    /// Eagerly registered names in `category`, in registration order.
    pub fn names(&self, category: &Category) -> Vec<String> {
        self.entries
            .read()
            .get(category)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.entries.read().keys().cloned().collect();
        categories.sort();
        categories
    }

    /// Register the exports of a lazily loaded module that nothing else claimed.
    fn register_missing_exports(&self, module: &Module) -> Result<(), FactoryError> {
        for export in module.exports() {
            if self.lookup(&export.category, &export.name).is_none() {
                self.register(&export.category, &export.name, export.implementation.clone())?;
            }
        }
        Ok(())
    }

    fn canonical(&self, category: &Category, name: &str) -> String {
        self.aliases
            .read()
            .get(category)
            .and_then(|aliases| aliases.get(name))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn lookup(&self, category: &Category, name: &str) -> Option<Implementation> {
        self.entries
            .read()
            .get(category)
            .and_then(|names| names.get(name))
            .cloned()
    }
}
