// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Loadable modules and the sources that supply them.
//!
//! A [`Module`] is the unit the lazy registry defers: a path plus the
//! components it exports. A [`ModuleSource`] turns a path into a module on
//! demand; [`StaticModules`] is the in-process table the built-in plugins use.

use std::collections::HashMap;

use super::category::Category;
use super::component::Implementation;
use crate::errors::ImportError;

/// One component exported by a module.
#[derive(Debug, Clone)]
pub struct ModuleExport {
    pub category: Category,
    pub name: String,
    pub implementation: Implementation,
}

/// A loaded module.
#[derive(Debug, Clone)]
pub struct Module {
    path: String,
    exports: Vec<ModuleExport>,
}

impl Module {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exports: Vec::new(),
        }
    }

    pub fn export(
        mut self,
        category: Category,
        name: impl Into<String>,
        implementation: Implementation,
    ) -> Self {
        self.exports.push(ModuleExport {
            category,
            name: name.into(),
            implementation,
        });
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn exports(&self) -> &[ModuleExport] {
        &self.exports
    }

    /// Look up an export by name, optionally restricted to one category.
    pub fn find(&self, category: Option<&Category>, name: &str) -> Option<&ModuleExport> {
        self.exports
            .iter()
            .find(|e| e.name == name && category.map_or(true, |c| &e.category == c))
    }
}

/// Supplies modules by path.
pub trait ModuleSource: Send + Sync {
    fn load(&self, path: &str) -> Result<Module, ImportError>;
}

pub type ModuleLoader = fn() -> Result<Module, ImportError>;

/// Module table keyed by full module path.
#[derive(Default)]
pub struct StaticModules {
    loaders: HashMap<String, ModuleLoader>,
}

impl StaticModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, loader: ModuleLoader) -> Self {
        self.loaders.insert(path.into(), loader);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, loader: ModuleLoader) {
        self.loaders.insert(path.into(), loader);
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }
}

impl ModuleSource for StaticModules {
    fn load(&self, path: &str) -> Result<Module, ImportError> {
        let loader = self
            .loaders
            .get(path)
            .ok_or_else(|| ImportError::ModuleNotFound {
                path: path.to_string(),
            })?;
        loader()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Capability, Instance};

    fn metrics() -> Result<Module, ImportError> {
        Ok(Module::new("vega.metrics.classifier")
            .export(
                Category::METRIC,
                "accuracy",
                Implementation::class(Capability::Generic, |_| Ok(Instance::generic(0.0f64))),
            )
            .export(
                Category::DATASET,
                "accuracy",
                Implementation::class(Capability::Generic, |_| Ok(Instance::generic(1u8))),
            ))
    }

    fn broken() -> Result<Module, ImportError> {
        Err(ImportError::Failed {
            path: "vega.networks.mindspore".to_string(),
            reason: "backend not installed".to_string(),
        })
    }

    #[test]
    fn static_modules_load_by_path() {
        let source = StaticModules::new()
            .with("vega.metrics.classifier", metrics)
            .with("vega.networks.mindspore", broken);

        let module = source.load("vega.metrics.classifier").unwrap();
        assert_eq!(module.path(), "vega.metrics.classifier");
        assert_eq!(module.exports().len(), 2);

        assert!(matches!(
            source.load("vega.networks.mindspore"),
            Err(ImportError::Failed { .. })
        ));
        assert_eq!(
            source.load("vega.missing").unwrap_err(),
            ImportError::ModuleNotFound {
                path: "vega.missing".to_string()
            }
        );
    }

    #[test]
    fn find_respects_category_filter() {
        let module = metrics().unwrap();
        assert_eq!(
            module.find(Some(&Category::DATASET), "accuracy").unwrap().category,
            Category::DATASET
        );
        assert_eq!(
            module.find(None, "accuracy").unwrap().category,
            Category::METRIC
        );
        assert!(module.find(Some(&Category::NETWORK), "accuracy").is_none());
    }
}
