// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lifecycle hooks and the dispatcher that drives them.
//!
//! Components contribute a [`Hook`] (handlers bound to [`EventKey`]s plus a
//! priority). Event sources call [`Dispatcher::fire`], which runs the bound
//! handlers in priority order and threads a shared [`HookResult`] through them.

pub mod dispatcher;
pub mod event;
pub mod hook;
pub mod predefined;

pub use dispatcher::{Dispatcher, HookId};
pub use event::{Event, EventKey, EventSource, Phase};
pub use hook::{is_flag_set, EventContext, Handler, Hook, HookBuilder, HookResult, ResultMap};
