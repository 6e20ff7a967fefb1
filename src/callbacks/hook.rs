// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Hooks: a component instance plus its `event -> handler` bindings.
//!
//! A [`Hook`] owns its component (the handlers' `&mut self`) so hook state
//! lives exactly as long as the dispatcher registration. Build one with
//! [`HookBuilder`]:
//!
//! ```
//! use vega_orchestrator::callbacks::{Event, HookBuilder};
//!
//! let hook = HookBuilder::new("counter", 0usize)
//!     .priority(-1)
//!     .on(Event::EstimRunEpoch.after(), |count, result, _ctx| {
//!         *count += 1;
//!         result
//!     })
//!     .build();
//!
//! assert_eq!(hook.priority(), -1);
//! ```

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;

use super::event::EventKey;
use crate::config::ConfigNode;
use crate::errors::DispatchError;

/// Mapping threaded through the handlers of one event.
pub type ResultMap = IndexMap<String, ConfigNode>;

/// `None` means "no change" when returned by a handler.
pub type HookResult = Option<ResultMap>;

/// True if `key` is present in `result` and set (`true` or a non-zero integer).
pub fn is_flag_set(result: Option<&ResultMap>, key: &str) -> bool {
    match result.and_then(|r| r.get(key)) {
        Some(ConfigNode::Bool(set)) => *set,
        Some(ConfigNode::Int(i)) => *i != 0,
        _ => false,
    }
}

/// Keyword context passed alongside the result (epoch, step, batch size...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventContext {
    values: IndexMap<String, ConfigNode>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigNode>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.values.get(key)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key)
            .and_then(ConfigNode::as_i64)
            .and_then(|v| usize::try_from(v).ok())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ConfigNode::as_f64)
    }
}

pub type Handler<T> = Box<dyn Fn(&mut T, HookResult, &EventContext) -> HookResult + Send>;

trait BoundHandlers: Send {
    fn events(&self) -> Vec<EventKey>;
    fn handles(&self, key: &EventKey) -> bool;
    fn invoke(&mut self, key: &EventKey, result: HookResult, ctx: &EventContext) -> HookResult;
    fn owner(&self) -> &dyn Any;
    fn into_owner(self: Box<Self>) -> Box<dyn Any>;
}

struct Bound<T> {
    owner: T,
    handlers: IndexMap<EventKey, Handler<T>>,
}

impl<T: Send + 'static> BoundHandlers for Bound<T> {
    fn events(&self) -> Vec<EventKey> {
        self.handlers.keys().copied().collect()
    }

    fn handles(&self, key: &EventKey) -> bool {
        self.handlers.contains_key(key)
    }

    fn invoke(&mut self, key: &EventKey, result: HookResult, ctx: &EventContext) -> HookResult {
        match self.handlers.get(key) {
            Some(handler) => handler(&mut self.owner, result, ctx),
            None => None,
        }
    }

    fn owner(&self) -> &dyn Any {
        &self.owner
    }

    fn into_owner(self: Box<Self>) -> Box<dyn Any> {
        Box::new(self.owner)
    }
}

/// A named, prioritised bundle of event handlers owned by one component.
pub struct Hook {
    name: String,
    priority: i32,
    bound: Box<dyn BoundHandlers>,
}

impl Hook {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower runs first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn events(&self) -> Vec<EventKey> {
        self.bound.events()
    }

    pub fn handles(&self, key: &EventKey) -> bool {
        self.bound.handles(key)
    }

    pub fn owner<T: 'static>(&self) -> Option<&T> {
        self.bound.owner().downcast_ref::<T>()
    }

    pub fn into_owner<T: 'static>(self) -> Option<T> {
        self.bound.into_owner().downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub(crate) fn invoke(
        &mut self,
        key: &EventKey,
        result: HookResult,
        ctx: &EventContext,
    ) -> HookResult {
        self.bound.invoke(key, result, ctx)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("events", &self.events())
            .finish()
    }
}

pub struct HookBuilder<T> {
    name: String,
    priority: i32,
    owner: T,
    handlers: IndexMap<EventKey, Handler<T>>,
}

impl<T: Send + 'static> HookBuilder<T> {
    pub fn new(name: impl Into<String>, owner: T) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            owner,
            handlers: IndexMap::new(),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Bind `handler` to `key`, replacing any earlier binding for the same key.
    pub fn on<F>(mut self, key: EventKey, handler: F) -> Self
    where
        F: Fn(&mut T, HookResult, &EventContext) -> HookResult + Send + 'static,
    {
        self.handlers.insert(key, Box::new(handler));
        self
    }

    /// [`on`](Self::on) with a string key, validated against the known events.
    pub fn bind<F>(self, key: &str, handler: F) -> Result<Self, DispatchError>
    where
        F: Fn(&mut T, HookResult, &EventContext) -> HookResult + Send + 'static,
    {
        let key = key.parse::<EventKey>()?;
        Ok(self.on(key, handler))
    }

    pub fn build(self) -> Hook {
        Hook {
            name: self.name,
            priority: self.priority,
            bound: Box::new(Bound {
                owner: self.owner,
                handlers: self.handlers,
            }),
        }
    }
}
