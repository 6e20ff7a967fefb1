// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::borrow::Cow;
use std::fmt;

use super::component::Capability;

/// Grouping key for component kinds in the class factory.
///
/// The set is open: any string is a valid category. The well-known ones are
/// provided as constants, and some of them carry a capability contract that is
/// checked at registration time (see [`Category::required_capability`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const CALLBACK: Category = Category(Cow::Borrowed("callback"));
    pub const ESTIMATOR: Category = Category(Cow::Borrowed("estimator"));
    pub const TRAINER: Category = Category(Cow::Borrowed("trainer"));
    pub const METRIC: Category = Category(Cow::Borrowed("metric"));
    pub const NETWORK: Category = Category(Cow::Borrowed("network"));
    pub const DATASET: Category = Category(Cow::Borrowed("dataset"));
    pub const SEARCH_ALGORITHM: Category = Category(Cow::Borrowed("search_algorithm"));
    pub const PIPE_STEP: Category = Category(Cow::Borrowed("pipe_step"));

    pub fn new(name: impl Into<String>) -> Self {
        Category(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Capability every implementation registered here must provide, if any.
    pub fn required_capability(&self) -> Option<Capability> {
        match self.as_str() {
            "callback" => Some(Capability::Callback),
            "estimator" => Some(Capability::Estimator),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::new(name)
    }
}
