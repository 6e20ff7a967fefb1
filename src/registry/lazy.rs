// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deferred module registration.
//!
//! `lazy_register` records what a module *will* export without loading it.
//! The first `resolve` of a `(namespace, name)` pair loads
//! `<namespace>.<name>` through the [`ModuleSource`], checks the declared
//! exports are present and caches the module. Later calls hand back the same
//! `Arc`. A failed load is reported and *not* cached, so it can be retried.

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::category::Category;
use super::module::{Module, ModuleSource};
use crate::errors::{ImportError, RegistryError};
use crate::observability::messages::registry::{
    LazyModuleRegistered, ModuleResolutionFailed, ModuleResolved,
};
use crate::observability::messages::StructuredLog;

/// An exported name as written in an import spec: `"Name"` or `"category:Name"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportName {
    pub category: Option<Category>,
    pub name: String,
}

impl ExportName {
    pub fn matches(&self, category: &Category, name: &str) -> bool {
        self.name == name && self.category.as_ref().map_or(true, |c| c == category)
    }
}

impl FromStr for ExportName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.split_once(':') {
            Some((category, name)) if !category.is_empty() => ExportName {
                category: Some(Category::new(category)),
                name: name.to_string(),
            },
            Some((_, name)) => ExportName {
                category: None,
                name: name.to_string(),
            },
            None => ExportName {
                category: None,
                name: s.to_string(),
            },
        })
    }
}

impl From<&str> for ExportName {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(export) => export,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ExportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{}:{}", category, self.name),
            None => f.write_str(&self.name),
        }
    }
}

struct LazyEntry {
    exports: Mutex<Vec<ExportName>>,
    loaded: Mutex<Option<Arc<Module>>>,
}

/// Registry of modules whose loading is deferred until first use.
pub struct LazyRegistry {
    source: Arc<dyn ModuleSource>,
    entries: RwLock<IndexMap<(String, String), Arc<LazyEntry>>>,
}

impl LazyRegistry {
    pub fn new(source: Arc<dyn ModuleSource>) -> Self {
        Self {
            source,
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Record `short name -> exported names` for `namespace` without loading anything.
    ///
    /// Registering the same pair again extends its export list.
    pub fn lazy_register<I, N, E>(&self, namespace: &str, mapping: I)
    where
        I: IntoIterator<Item = (N, Vec<E>)>,
        N: Into<String>,
        E: Into<ExportName>,
    {
        let mut entries = self.entries.write();
        for (name, exports) in mapping {
            let name = name.into();
            let entry = entries
                .entry((namespace.to_string(), name.clone()))
                .or_insert_with(|| {
                    Arc::new(LazyEntry {
                        exports: Mutex::new(Vec::new()),
                        loaded: Mutex::new(None),
                    })
                });
            let mut declared = entry.exports.lock();
            for export in exports.into_iter().map(Into::into) {
                if !declared.contains(&export) {
                    declared.push(export);
                }
            }
            LazyModuleRegistered {
                namespace,
                name: &name,
                export_count: declared.len(),
            }
            .log();
        }
    }

    /// Load (once) and return the module behind `namespace`/`name`.
    pub fn resolve(&self, namespace: &str, name: &str) -> Result<Arc<Module>, RegistryError> {
        let entry = self.entry(namespace, name).ok_or_else(|| RegistryError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;

        // held across the load so concurrent first calls import once
        let mut loaded = entry.loaded.lock();
        if let Some(module) = loaded.as_ref() {
            return Ok(Arc::clone(module));
        }

        let path = format!("{}.{}", namespace, name);
        let result = self.source.load(&path).and_then(|module| {
            let declared = entry.exports.lock();
            match declared
                .iter()
                .find(|e| module.find(e.category.as_ref(), &e.name).is_none())
            {
                Some(missing) => Err(ImportError::MissingExport {
                    path: path.clone(),
                    name: missing.to_string(),
                }),
                None => Ok(module),
            }
        });

        match result {
            Ok(module) => {
                let module = Arc::new(module);
                *loaded = Some(Arc::clone(&module));
                ModuleResolved {
                    namespace,
                    name,
                    export_count: module.exports().len(),
                }
                .log();
                Ok(module)
            }
            Err(source) => {
                let error = RegistryError::ImportFailure {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source,
                };
                ModuleResolutionFailed {
                    namespace,
                    name,
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }

    /// First registered `(namespace, name)` whose declared exports include `name` for `category`.
    pub fn find_provider(&self, category: &Category, name: &str) -> Option<(String, String)> {
        self.entries
            .read()
            .iter()
            .find(|(_, entry)| entry.exports.lock().iter().any(|e| e.matches(category, name)))
            .map(|(key, _)| key.clone())
    }

    pub fn is_registered(&self, namespace: &str, name: &str) -> bool {
        self.entry(namespace, name).is_some()
    }

    pub fn is_loaded(&self, namespace: &str, name: &str) -> bool {
        self.entry(namespace, name)
            .map_or(false, |entry| entry.loaded.lock().is_some())
    }

    pub fn registered(&self) -> Vec<(String, String)> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn exports(&self, namespace: &str, name: &str) -> Vec<ExportName> {
        self.entry(namespace, name)
            .map(|entry| entry.exports.lock().clone())
            .unwrap_or_default()
    }

    fn entry(&self, namespace: &str, name: &str) -> Option<Arc<LazyEntry>> {
        self.entries
            .read()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }
}
