// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Priority-ordered hook dispatch.
//!
//! Hooks are kept sorted by ascending priority; equal priorities keep
//! registration order. [`Dispatcher::fire`] walks them in that order and
//! threads one result through every handler bound to the event:
//!
//! * a handler gets the current result (the caller's seed for the first one)
//! * a returned mapping replaces the current result, empty or not
//! * a returned `None` leaves the current result as it was
//!
//! Dispatch is synchronous; a handler runs to completion before the next starts.

use std::str::FromStr;

use super::event::EventKey;
use super::hook::{EventContext, Hook, HookResult};
use crate::errors::DispatchError;
use crate::observability::messages::callback::HookRegistered;
use crate::observability::messages::StructuredLog;

/// Handle returned by [`Dispatcher::register_hook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

#[derive(Debug, Default)]
pub struct Dispatcher {
    hooks: Vec<(HookId, Hook)>,
    next_id: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_hook(&mut self, hook: Hook) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;

        HookRegistered {
            hook: hook.name(),
            priority: hook.priority(),
            binding_count: hook.events().len(),
        }
        .log();

        let at = self
            .hooks
            .partition_point(|(_, h)| h.priority() <= hook.priority());
        self.hooks.insert(at, (id, hook));
        id
    }

    pub fn unregister_hook(&mut self, id: HookId) -> Option<Hook> {
        let at = self.hooks.iter().position(|(hook_id, _)| *hook_id == id)?;
        Some(self.hooks.remove(at).1)
    }

    /// Drop every hook, typically at a run boundary.
    pub fn clear(&mut self) {
        self.hooks.clear();
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook names in dispatch order.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|(_, h)| h.name()).collect()
    }

    pub fn hook(&self, id: HookId) -> Option<&Hook> {
        self.hooks
            .iter()
            .find(|(hook_id, _)| *hook_id == id)
            .map(|(_, hook)| hook)
    }

    pub fn find<T: 'static>(&self) -> Option<&T> {
        self.hooks.iter().find_map(|(_, hook)| hook.owner::<T>())
    }

    pub fn fire(&mut self, key: &EventKey, ctx: &EventContext, seed: HookResult) -> HookResult {
        let mut result = seed;
        for (_, hook) in self.hooks.iter_mut().filter(|(_, h)| h.handles(key)) {
            if let Some(returned) = hook.invoke(key, result.clone(), ctx) {
                result = Some(returned);
            }
        }
        result
    }

    /// [`fire`](Self::fire) with a string key.
    pub fn fire_str(
        &mut self,
        key: &str,
        ctx: &EventContext,
        seed: HookResult,
    ) -> Result<HookResult, DispatchError> {
        let key = EventKey::from_str(key)?;
        Ok(self.fire(&key, ctx, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{Event, HookBuilder, ResultMap};
    use crate::config::ConfigNode;
    use std::sync::{Arc, Mutex};

    type Trace = Arc<Mutex<Vec<String>>>;

    fn tracing_hook(name: &'static str, priority: i32, trace: &Trace) -> Hook {
        let trace = Arc::clone(trace);
        HookBuilder::new(name, ())
            .priority(priority)
            .on(Event::EstimRunEpoch.after(), move |_, result, _| {
                trace.lock().unwrap().push(name.to_string());
                result
            })
            .build()
    }

    fn single(key: &str, value: impl Into<ConfigNode>) -> ResultMap {
        let mut map = ResultMap::new();
        map.insert(key.to_string(), value.into());
        map
    }

    #[test]
    fn priority_order_with_stable_ties() {
        struct TestCase {
            name: &'static str,
            hooks: Vec<(&'static str, i32)>,
            expected: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "distinct priorities in reverse",
                hooks: vec![("reporter", 0), ("timer", -1), ("early_stop", -10)],
                expected: vec!["early_stop", "timer", "reporter"],
            },
            TestCase {
                name: "equal priorities keep registration order",
                hooks: vec![("a", 0), ("b", 0), ("c", 0)],
                expected: vec!["a", "b", "c"],
            },
            TestCase {
                name: "mixed",
                hooks: vec![("a", 0), ("b", -1), ("c", 0), ("d", -1), ("e", 5)],
                expected: vec!["b", "d", "a", "c", "e"],
            },
        ];

        for tc in test_cases {
            let trace: Trace = Arc::default();
            let mut dispatcher = Dispatcher::new();
            for (name, priority) in &tc.hooks {
                dispatcher.register_hook(tracing_hook(name, *priority, &trace));
            }
            assert_eq!(dispatcher.hook_names(), tc.expected, "{}", tc.name);

            dispatcher.fire(&Event::EstimRunEpoch.after(), &EventContext::new(), None);
            let fired: Vec<String> = trace.lock().unwrap().clone();
            assert_eq!(fired, tc.expected, "{}", tc.name);
        }
    }

    #[test]
    fn none_leaves_result_unchanged() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_hook(
            HookBuilder::new("loss", ())
                .priority(-1)
                .on(Event::TrainerLoss.after(), |_, _, _| Some(single("loss", 1.0)))
                .build(),
        );
        dispatcher.register_hook(
            HookBuilder::new("silent", ())
                .on(Event::TrainerLoss.after(), |_, _, _| None)
                .build(),
        );

        let result = dispatcher.fire(&Event::TrainerLoss.after(), &EventContext::new(), None);
        assert_eq!(result, Some(single("loss", 1.0)));
    }

    #[test]
    fn returned_mapping_replaces_result_and_is_seen_downstream() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_hook(
            HookBuilder::new("stopper", ())
                .priority(-10)
                .on(Event::EstimRunEpoch.after(), |_, result, _| {
                    let mut result = result.unwrap_or_default();
                    result.insert("stop".to_string(), ConfigNode::Bool(true));
                    Some(result)
                })
                .build(),
        );
        dispatcher.register_hook(
            HookBuilder::new("observer", Vec::<bool>::new())
                .on(Event::EstimRunEpoch.after(), |seen, result, _| {
                    let stop = result
                        .as_ref()
                        .and_then(|r| r.get("stop"))
                        .and_then(ConfigNode::as_bool)
                        .unwrap_or(false);
                    seen.push(stop);
                    None
                })
                .build(),
        );

        let seed = Some(single("epoch", 0));
        let result = dispatcher
            .fire(&Event::EstimRunEpoch.after(), &EventContext::new(), seed)
            .unwrap();
        assert_eq!(result.get("epoch"), Some(&ConfigNode::Int(0)));
        assert_eq!(result.get("stop"), Some(&ConfigNode::Bool(true)));
        assert_eq!(dispatcher.find::<Vec<bool>>(), Some(&vec![true]));
    }

    #[test]
    fn empty_mapping_is_an_explicit_result() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_hook(
            HookBuilder::new("clear", ())
                .on(Event::EstimStep.after(), |_, _, _| Some(ResultMap::new()))
                .build(),
        );
        let result = dispatcher.fire(
            &Event::EstimStep.after(),
            &EventContext::new(),
            Some(single("loss", 2.0)),
        );
        assert_eq!(result, Some(ResultMap::new()));
    }

    #[test]
    fn unbound_events_return_the_seed() {
        let trace: Trace = Arc::default();
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_hook(tracing_hook("a", 0, &trace));

        assert_eq!(
            dispatcher.fire(&Event::EstimRun.before(), &EventContext::new(), None),
            None
        );
        assert!(trace.lock().unwrap().is_empty());
    }

    #[test]
    fn unregister_and_clear() {
        let trace: Trace = Arc::default();
        let mut dispatcher = Dispatcher::new();
        let a = dispatcher.register_hook(tracing_hook("a", 0, &trace));
        dispatcher.register_hook(tracing_hook("b", 0, &trace));

        assert_eq!(dispatcher.unregister_hook(a).map(|h| h.name().to_string()), Some("a".into()));
        assert!(dispatcher.unregister_hook(a).is_none());
        assert!(dispatcher.hook(a).is_none());
        assert_eq!(dispatcher.hook_names(), vec!["b"]);

        dispatcher.clear();
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn fire_str_validates_key() {
        let mut dispatcher = Dispatcher::new();
        assert!(dispatcher
            .fire_str("after:EstimBase.run_epoch", &EventContext::new(), None)
            .is_ok());
        assert!(matches!(
            dispatcher.fire_str("after:EstimBase.nope", &EventContext::new(), None),
            Err(DispatchError::UnknownEvent { .. })
        ));
    }
}
