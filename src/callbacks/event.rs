// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event keys: `"<before|after>:<Source>.<name>"`.
//!
//! The set of events is closed. String keys coming from configuration or
//! plugin code are parsed into an [`EventKey`] when a handler is bound, so a
//! typo fails at registration instead of silently never firing.

use std::fmt;
use std::str::FromStr;

use crate::errors::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Before,
    After,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::After => "after",
        }
    }
}

/// Component that emits an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    EstimBase,
    TrainerBase,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::EstimBase => "EstimBase",
            EventSource::TrainerBase => "TrainerBase",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    EstimRun,
    EstimRunEpoch,
    EstimStep,
    EstimStepDone,
    TrainerTrainEpoch,
    TrainerValidEpoch,
    TrainerTrainStep,
    TrainerValidStep,
    TrainerLoss,
}

impl Event {
    pub const ALL: [Event; 9] = [
        Event::EstimRun,
        Event::EstimRunEpoch,
        Event::EstimStep,
        Event::EstimStepDone,
        Event::TrainerTrainEpoch,
        Event::TrainerValidEpoch,
        Event::TrainerTrainStep,
        Event::TrainerValidStep,
        Event::TrainerLoss,
    ];

    pub fn source(&self) -> EventSource {
        match self {
            Event::EstimRun | Event::EstimRunEpoch | Event::EstimStep | Event::EstimStepDone => {
                EventSource::EstimBase
            }
            _ => EventSource::TrainerBase,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::EstimRun => "run",
            Event::EstimRunEpoch => "run_epoch",
            Event::EstimStep => "step",
            Event::EstimStepDone => "step_done",
            Event::TrainerTrainEpoch => "train_epoch",
            Event::TrainerValidEpoch => "valid_epoch",
            Event::TrainerTrainStep => "train_step",
            Event::TrainerValidStep => "valid_step",
            Event::TrainerLoss => "loss",
        }
    }

    pub fn lookup(source: &str, name: &str) -> Option<Event> {
        Event::ALL
            .into_iter()
            .find(|e| e.source().as_str() == source && e.name() == name)
    }

    pub fn before(self) -> EventKey {
        EventKey::new(Phase::Before, self)
    }

    pub fn after(self) -> EventKey {
        EventKey::new(Phase::After, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub phase: Phase,
    pub event: Event,
}

impl EventKey {
    pub fn new(phase: Phase, event: Event) -> Self {
        Self { phase, event }
    }
}

impl FromStr for EventKey {
    type Err = DispatchError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| DispatchError::MalformedEventKey {
            key: key.to_string(),
            reason,
        };

        let (phase, target) = key
            .split_once(':')
            .ok_or_else(|| malformed("expected '<before|after>:<Source>.<name>'"))?;
        let phase = match phase {
            "before" => Phase::Before,
            "after" => Phase::After,
            _ => return Err(malformed("phase must be 'before' or 'after'")),
        };
        let (source, name) = target
            .split_once('.')
            .ok_or_else(|| malformed("expected '<Source>.<name>' after the phase"))?;
        if source.is_empty() || name.is_empty() {
            return Err(malformed("source and event name must be non-empty"));
        }

        Event::lookup(source, name)
            .map(|event| EventKey::new(phase, event))
            .ok_or_else(|| DispatchError::UnknownEvent {
                key: key.to_string(),
            })
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}.{}",
            self.phase.as_str(),
            self.event.source().as_str(),
            self.event.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_keys() {
        struct TestCase {
            name: &'static str,
            input: &'static str,
            expected: Result<EventKey, &'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "estimator epoch",
                input: "after:EstimBase.run_epoch",
                expected: Ok(Event::EstimRunEpoch.after()),
            },
            TestCase {
                name: "trainer loss",
                input: "before:TrainerBase.loss",
                expected: Ok(Event::TrainerLoss.before()),
            },
            TestCase {
                name: "missing phase",
                input: "EstimBase.run",
                expected: Err("malformed"),
            },
            TestCase {
                name: "bad phase",
                input: "during:EstimBase.run",
                expected: Err("malformed"),
            },
            TestCase {
                name: "missing event name",
                input: "after:EstimBase",
                expected: Err("malformed"),
            },
            TestCase {
                name: "typo in name",
                input: "after:EstimBase.run_epcoh",
                expected: Err("unknown"),
            },
            TestCase {
                name: "event under wrong source",
                input: "after:TrainerBase.run",
                expected: Err("unknown"),
            },
        ];

        for tc in test_cases {
            let parsed = tc.input.parse::<EventKey>();
            match (parsed, tc.expected) {
                (Ok(key), Ok(expected)) => assert_eq!(key, expected, "{}", tc.name),
                (Err(DispatchError::MalformedEventKey { .. }), Err("malformed")) => {}
                (Err(DispatchError::UnknownEvent { .. }), Err("unknown")) => {}
                (actual, expected) => {
                    panic!("{}: got {:?}, expected {:?}", tc.name, actual, expected)
                }
            }
        }
    }

    #[test]
    fn display_matches_parse_format() {
        for event in Event::ALL {
            for key in [event.before(), event.after()] {
                assert_eq!(key.to_string().parse::<EventKey>().unwrap(), key);
            }
        }
        assert_eq!(Event::EstimRun.before().to_string(), "before:EstimBase.run");
    }
}
