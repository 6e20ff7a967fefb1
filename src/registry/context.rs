// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, OnceLock};

use super::category::Category;
use super::component::{Created, Implementation, Params};
use super::factory::{ClassFactory, RegisterOutcome};
use super::lazy::{ExportName, LazyRegistry};
use super::module::{Module, ModuleSource};
use crate::errors::{FactoryError, RegistryError};
use crate::plugins;

/// The lazy registry and class factory a session registers into and resolves from.
///
/// Tests and embedders build their own with [`RegistryContext::new`];
/// [`RegistryContext::global`] is the shared instance, initialized once with
/// the built-in plugins on first access.
pub struct RegistryContext {
    lazy: Arc<LazyRegistry>,
    factory: ClassFactory,
}

impl RegistryContext {
    pub fn new(source: Arc<dyn ModuleSource>) -> Self {
        let lazy = Arc::new(LazyRegistry::new(source));
        Self {
            factory: ClassFactory::new(Arc::clone(&lazy)),
            lazy,
        }
    }

    /// A fresh context with the built-in plugins lazily registered.
    pub fn with_builtins() -> Self {
        let ctx = Self::new(Arc::new(plugins::builtin_modules()));
        plugins::register_builtins(&ctx);
        ctx
    }

    pub fn global() -> &'static RegistryContext {
        static GLOBAL: OnceLock<RegistryContext> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtins)
    }

    pub fn lazy(&self) -> &LazyRegistry {
        &self.lazy
    }

    pub fn factory(&self) -> &ClassFactory {
        &self.factory
    }

    pub fn lazy_register<I, N, E>(&self, namespace: &str, mapping: I)
    where
        I: IntoIterator<Item = (N, Vec<E>)>,
        N: Into<String>,
        E: Into<ExportName>,
    {
        self.lazy.lazy_register(namespace, mapping)
    }

    pub fn resolve(&self, namespace: &str, name: &str) -> Result<Arc<Module>, RegistryError> {
        self.lazy.resolve(namespace, name)
    }

    pub fn register(
        &self,
        category: &Category,
        name: &str,
        implementation: Implementation,
    ) -> Result<RegisterOutcome, FactoryError> {
        self.factory.register(category, name, implementation)
    }

    pub fn get(&self, category: &Category, name: &str) -> Result<Implementation, FactoryError> {
        self.factory.get(category, name)
    }

    pub fn create(
        &self,
        category: &Category,
        name: &str,
        params: Params,
    ) -> Result<Created, FactoryError> {
        self.factory.create(category, name, params)
    }
}
