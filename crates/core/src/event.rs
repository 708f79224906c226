// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event values and the disposable capability
//!
//! Every value that goes through the bus implements [`Event`], which gives
//! read access to an [`EventHeader`] (id + creation time). Events that are
//! consumed exactly once carry a [`Disposal`] flag and return it from
//! [`Event::disposal`]; [`Disposable`] is the capability view over that flag.

use crate::capability::Capabilities;
use crate::clock::{Clock, SystemClock};
use crate::id::{EventId, IdGen, UuidIdGen};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// Identity and creation time of an event, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHeader {
    id: EventId,
    timestamp: DateTime<Utc>,
}

impl EventHeader {
    /// Fresh UUID and the current wall-clock time
    pub fn new() -> Self {
        Self::with(&UuidIdGen, &SystemClock)
    }

    pub fn with(id_gen: &impl IdGen, clock: &impl Clock) -> Self {
        Self {
            id: id_gen.next(),
            timestamp: clock.now(),
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Default for EventHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Base capability shared by every event value
///
/// Capability traits that should be usable as subscription keys take
/// `Event` as a supertrait and are declared per concrete type in
/// [`Event::capabilities`].
pub trait Event: Any + Send + Sync {
    fn header(&self) -> &EventHeader;

    fn id(&self) -> &EventId {
        self.header().id()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.header().timestamp()
    }

    /// Name of the concrete type, used in logs and errors
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Consumed flag of a one-shot event.
    ///
    /// This is the only place disposability is declared: returning
    /// `Some` makes the type disposable everywhere, including delivery to
    /// `dyn Disposable` subscribers.
    fn disposal(&self) -> Option<&Disposal> {
        None
    }

    /// Declare the capability traits this type can be delivered as.
    ///
    /// The concrete type itself and `dyn Event` are always included, and
    /// `dyn Disposable` is added for events that return a [`Disposal`].
    fn capabilities(caps: &mut Capabilities<Self>)
    where
        Self: Sized,
    {
        let _ = caps;
    }
}

/// One-way consumed flag
#[derive(Debug, Default)]
pub struct Disposal(AtomicBool);

impl Disposal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag; returns true only for the call that flipped it
    pub fn dispose(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

impl Clone for Disposal {
    fn clone(&self) -> Self {
        Self(AtomicBool::new(self.is_disposed()))
    }
}

/// Capability of events that can be consumed exactly once
///
/// Implemented for every concrete event over [`Event::disposal`], so it
/// cannot disagree with what the bus sees. Events without a [`Disposal`]
/// are never disposed: `mark_disposed` is a no-op returning false.
/// A disposed event is never delivered again and cannot be republished.
pub trait Disposable: Event {
    fn is_disposed(&self) -> bool {
        self.disposal().is_some_and(Disposal::is_disposed)
    }

    /// Mark the event consumed. Idempotent; never un-disposes.
    fn mark_disposed(&self) -> bool {
        self.disposal().is_some_and(Disposal::dispose)
    }
}

impl<E: Event> Disposable for E {}

/// True when the event is disposable and already consumed
pub(crate) fn is_disposed<E: Event + ?Sized>(event: &E) -> bool {
    event.disposal().is_some_and(Disposal::is_disposed)
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
