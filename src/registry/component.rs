// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component implementations and what the factory builds from them.
//!
//! An [`Implementation`] is either a *class* (a [`Constructor`] that builds an
//! [`Instance`] from keyword parameters) or a *function* (a [`ComponentFn`]
//! that the factory partially applies, see [`PartialFn`]).

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::callbacks::Hook;
use crate::config::{ConfigNode, Mapping};
use crate::traits::Estimator;
use crate::errors::ComponentError;

/// Keyword parameters handed to a constructor or bound into a function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Mapping);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigNode>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigNode>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigNode)> {
        self.0.iter()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    /// Deserialize `key` into `T`; absent or null reads as `None`.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ComponentError> {
        match self.0.get(key) {
            None | Some(ConfigNode::Null) => Ok(None),
            Some(node) => {
                let invalid = |reason: String| ComponentError::InvalidParam {
                    name: key.to_string(),
                    reason,
                };
                let value = serde_json::to_value(node).map_err(|e| invalid(e.to_string()))?;
                serde_json::from_value(value)
                    .map(Some)
                    .map_err(|e| invalid(e.to_string()))
            }
        }
    }

    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, ComponentError> {
        self.optional(key)?
            .ok_or_else(|| ComponentError::MissingParam {
                name: key.to_string(),
            })
    }

    /// Copy of these params with `extra` layered on top (extra wins).
    pub fn merged(&self, extra: &Params) -> Params {
        let mut merged = self.0.clone();
        for (key, value) in extra.iter() {
            merged.insert(key.clone(), value.clone());
        }
        Params(merged)
    }
}

impl From<Mapping> for Params {
    fn from(map: Mapping) -> Self {
        Params(map)
    }
}

impl FromIterator<(String, ConfigNode)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ConfigNode)>>(iter: I) -> Self {
        Params(iter.into_iter().collect::<IndexMap<_, _>>())
    }
}

/// What a component can be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Builds a dispatcher [`Hook`]
    Callback,
    /// Builds an [`Estimator`] the run loop can drive
    Estimator,
    /// Builds an opaque value the caller downcasts
    Generic,
    /// A plain function, partially applied by the factory
    Function,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Callback => "callback",
            Capability::Estimator => "estimator",
            Capability::Generic => "generic",
            Capability::Function => "function",
        })
    }
}

/// A constructed component.
pub enum Instance {
    Callback(Hook),
    Estimator(Box<dyn Estimator>),
    Generic(Box<dyn Any + Send>),
}

impl Instance {
    pub fn generic<T: Any + Send>(value: T) -> Self {
        Instance::Generic(Box::new(value))
    }

    pub fn capability(&self) -> Capability {
        match self {
            Instance::Callback(_) => Capability::Callback,
            Instance::Estimator(_) => Capability::Estimator,
            Instance::Generic(_) => Capability::Generic,
        }
    }

    pub fn into_hook(self) -> Option<Hook> {
        match self {
            Instance::Callback(hook) => Some(hook),
            _ => None,
        }
    }

    pub fn into_estimator(self) -> Option<Box<dyn Estimator>> {
        match self {
            Instance::Estimator(estimator) => Some(estimator),
            _ => None,
        }
    }

    pub fn downcast<T: Any>(self) -> Option<T> {
        match self {
            Instance::Generic(value) => value.downcast::<T>().ok().map(|boxed| *boxed),
            _ => None,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::Callback(hook) => f.debug_tuple("Callback").field(&hook.name()).finish(),
            Instance::Estimator(estimator) => {
                f.debug_tuple("Estimator").field(&estimator.name()).finish()
            }
            Instance::Generic(_) => f.write_str("Generic(..)"),
        }
    }
}

/// Builds instances of a class implementation.
pub trait Constructor: Send + Sync {
    fn capability(&self) -> Capability;

    fn construct(&self, params: &Params) -> Result<Instance, ComponentError>;
}

struct ClassFn<F> {
    capability: Capability,
    build: F,
}

impl<F> Constructor for ClassFn<F>
where
    F: Fn(&Params) -> Result<Instance, ComponentError> + Send + Sync,
{
    fn capability(&self) -> Capability {
        self.capability
    }

    fn construct(&self, params: &Params) -> Result<Instance, ComponentError> {
        (self.build)(params)
    }
}

/// A function implementation.
pub trait ComponentFn: Send + Sync {
    fn call(&self, params: &Params) -> Result<ConfigNode, ComponentError>;
}

impl<F> ComponentFn for F
where
    F: Fn(&Params) -> Result<ConfigNode, ComponentError> + Send + Sync,
{
    fn call(&self, params: &Params) -> Result<ConfigNode, ComponentError> {
        self(params)
    }
}

/// A registered implementation. Cloning shares the underlying object.
#[derive(Clone)]
pub enum Implementation {
    Class(Arc<dyn Constructor>),
    Function(Arc<dyn ComponentFn>),
}

impl Implementation {
    pub fn class<F>(capability: Capability, build: F) -> Self
    where
        F: Fn(&Params) -> Result<Instance, ComponentError> + Send + Sync + 'static,
    {
        Implementation::Class(Arc::new(ClassFn { capability, build }))
    }

    pub fn function<F>(func: F) -> Self
    where
        F: Fn(&Params) -> Result<ConfigNode, ComponentError> + Send + Sync + 'static,
    {
        Implementation::Function(Arc::new(func))
    }

    pub fn capability(&self) -> Capability {
        match self {
            Implementation::Class(constructor) => constructor.capability(),
            Implementation::Function(_) => Capability::Function,
        }
    }

    /// True when both handles point at the same implementation object.
    pub fn same_as(&self, other: &Implementation) -> bool {
        match (self, other) {
            (Implementation::Class(a), Implementation::Class(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Implementation::Function(a), Implementation::Function(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Class(constructor) => f
                .debug_struct("Class")
                .field("capability", &constructor.capability())
                .finish(),
            Implementation::Function(_) => f.write_str("Function"),
        }
    }
}

/// Result of [`ClassFactory::create`](crate::registry::ClassFactory::create).
#[derive(Debug)]
pub enum Created {
    Instance(Instance),
    Partial(PartialFn),
}

impl Created {
    pub fn into_instance(self) -> Option<Instance> {
        match self {
            Created::Instance(instance) => Some(instance),
            Created::Partial(_) => None,
        }
    }

    pub fn into_partial(self) -> Option<PartialFn> {
        match self {
            Created::Partial(partial) => Some(partial),
            Created::Instance(_) => None,
        }
    }
}

/// A function with some keyword parameters already bound.
#[derive(Clone)]
pub struct PartialFn {
    func: Arc<dyn ComponentFn>,
    bound: Params,
}

impl PartialFn {
    pub fn new(func: Arc<dyn ComponentFn>, bound: Params) -> Self {
        Self { func, bound }
    }

    pub fn bound(&self) -> &Params {
        &self.bound
    }

    /// Call with `extra` params layered over the bound ones.
    pub fn call(&self, extra: Params) -> Result<ConfigNode, ComponentError> {
        self.func.call(&self.bound.merged(&extra))
    }
}

impl fmt::Debug for PartialFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialFn").field("bound", &self.bound).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_param_access() {
        let params = Params::new()
            .with("threshold", 4)
            .with("interval", 0.25)
            .with("mode", "max")
            .with("skip", ConfigNode::Null);

        assert_eq!(params.required::<usize>("threshold").unwrap(), 4);
        assert_eq!(params.optional::<f64>("interval").unwrap(), Some(0.25));
        assert_eq!(params.optional::<String>("mode").unwrap().as_deref(), Some("max"));
        assert_eq!(params.optional::<usize>("skip").unwrap(), None);
        assert_eq!(params.optional::<usize>("absent").unwrap(), None);
    }

    #[test]
    fn param_errors_name_the_param() {
        let params = Params::new().with("threshold", "ten");
        let err = params.required::<usize>("threshold").unwrap_err();
        assert!(matches!(err, ComponentError::InvalidParam { ref name, .. } if name == "threshold"));
        let err = params.required::<usize>("missing").unwrap_err();
        assert_eq!(
            err,
            ComponentError::MissingParam {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn partial_application_layers_extra_params() {
        let scale = Implementation::function(|p: &Params| {
            let value: f64 = p.required("value")?;
            let factor: f64 = p.required("factor")?;
            Ok(ConfigNode::Float(value * factor))
        });
        let func = match scale {
            Implementation::Function(func) => func,
            _ => unreachable!(),
        };
        let partial = PartialFn::new(func, Params::new().with("factor", 2.0));
        assert_eq!(
            partial.call(Params::new().with("value", 3.0)).unwrap(),
            ConfigNode::Float(6.0)
        );
        assert_eq!(
            partial
                .call(Params::new().with("value", 3.0).with("factor", 10.0))
                .unwrap(),
            ConfigNode::Float(30.0)
        );
    }

    #[test]
    fn identity_is_by_shared_object() {
        let a = Implementation::class(Capability::Generic, |_| Ok(Instance::generic(1u8)));
        let b = Implementation::class(Capability::Generic, |_| Ok(Instance::generic(1u8)));
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn generic_instances_downcast() {
        let instance = Instance::generic(String::from("resnet"));
        assert_eq!(instance.capability(), Capability::Generic);
        assert_eq!(instance.downcast::<String>().as_deref(), Some("resnet"));
    }
}
