// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handlers and subscription handles

use crate::event::Event;
use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Error a handler can return to abort a synchronous publish
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of one handler invocation
pub type HandlerResult = Result<(), HandlerError>;

/// Shared callback for events delivered as `T`.
///
/// Keep a clone of the `Arc` to unsubscribe by identity with
/// [`EventBus::unsubscribe_handler`](super::EventBus::unsubscribe_handler).
pub type Handler<T> = Arc<dyn Fn(&T) -> HandlerResult + Send + Sync>;

/// Wrap a closure as a [`Handler`] for `T`
pub fn handler<T: ?Sized + Event>(
    f: impl Fn(&T) -> HandlerResult + Send + Sync + 'static,
) -> Handler<T> {
    Arc::new(f)
}

/// Priority used when none is given
pub const DEFAULT_PRIORITY: i32 = 0;

/// Identifier of one registration, unique within a bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registry a handle was issued by, shared by a bus and its clones
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct BusId(u64);

impl BusId {
    /// Process-wide unique; never reused while the process runs
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle returned by subscribe, used to unsubscribe.
///
/// Only the bus that issued it (or a clone of that bus) honors it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub priority: i32,
    bus: BusId,
    key: TypeId,
    event_type: &'static str,
}

impl Subscription {
    pub(crate) fn new(
        bus: BusId,
        id: SubscriptionId,
        priority: i32,
        key: TypeId,
        event_type: &'static str,
    ) -> Self {
        Self {
            id,
            priority,
            bus,
            key,
            event_type,
        }
    }

    pub(crate) fn bus(&self) -> BusId {
        self.bus
    }

    pub(crate) fn key(&self) -> TypeId {
        self.key
    }

    /// Name of the subscribed type or capability
    pub fn event_type(&self) -> &'static str {
        self.event_type
    }

    /// Check whether the subscription key is `T`
    pub fn is_for<T: ?Sized + Event>(&self) -> bool {
        self.key == TypeId::of::<T>()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
