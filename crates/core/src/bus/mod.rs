// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed dispatch of events to subscribers
//!
//! This module provides:
//! - `EventBus` - Route events to handlers by concrete type or capability
//! - `Subscription` - Handle used to unsubscribe a registration
//! - `Handler` - Shared callback whose identity can also unsubscribe

mod dispatcher;
mod registry;
mod subscription;

pub use dispatcher::{DispatchReport, EventBus, PublishOptions};
pub use subscription::{
    handler, Handler, HandlerError, HandlerResult, Subscription, SubscriptionId, DEFAULT_PRIORITY,
};
