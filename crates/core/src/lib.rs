// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! typebus: in-process typed publish/subscribe
//!
//! This crate provides:
//! - Event values with identity, timestamp and an optional one-way disposed flag
//! - Capability declaration so handlers can subscribe to traits, not just types
//! - A priority-ordered synchronous dispatcher and an async fan-out mode

pub mod bus;
pub mod capability;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod id;

#[cfg(test)]
mod fixtures;

// Re-exports
pub use bus::{
    handler, DispatchReport, EventBus, Handler, HandlerError, HandlerResult, PublishOptions,
    Subscription, SubscriptionId, DEFAULT_PRIORITY,
};
pub use capability::Capabilities;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::BusConfig;
pub use error::{BusError, ConfigError, Result};
pub use event::{Disposable, Disposal, Event, EventHeader};
pub use id::{EventId, IdGen, SequentialIdGen, UuidIdGen};
