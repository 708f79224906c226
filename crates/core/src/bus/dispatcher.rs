// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing typed events to subscribers

use super::registry::{Registration, Registry};
use super::subscription::{
    BusId, Handler, HandlerError, HandlerResult, Subscription, SubscriptionId, DEFAULT_PRIORITY,
};
use crate::capability::Capabilities;
use crate::config::BusConfig;
use crate::error::{BusError, Result};
use crate::event::{is_disposed, Disposable, Event};
use std::any::{type_name, Any, TypeId};
use std::cmp::Reverse;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::task::JoinSet;
use tracing::Instrument;

/// Per-call publish settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    /// Mark disposable events disposed once delivery finishes
    pub auto_dispose: bool,
}

impl PublishOptions {
    pub fn auto_dispose(auto_dispose: bool) -> Self {
        Self { auto_dispose }
    }
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self { auto_dispose: true }
    }
}

impl From<&BusConfig> for PublishOptions {
    fn from(config: &BusConfig) -> Self {
        Self {
            auto_dispose: config.auto_dispose,
        }
    }
}

/// Summary of one `publish_async` fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Registrations resolved for the event
    pub handlers: usize,
    /// Handlers that were called, including ones that failed
    pub invoked: usize,
    /// Units that found the event already disposed
    pub skipped: usize,
    /// Handlers that returned an error or panicked
    pub faulted: usize,
}

impl DispatchReport {
    pub fn had_handlers(&self) -> bool {
        self.handlers > 0
    }
}

/// A registration matched to the capability it is delivered through
struct Delivery {
    capability: usize,
    registration: Arc<Registration>,
}

enum UnitOutcome {
    Delivered,
    Skipped,
    Failed(HandlerError),
    Panicked(String),
}

/// The event bus routes published events to handlers subscribed to the
/// event's concrete type or to any capability it declares.
///
/// Clones share one registry. Separate `EventBus::new()` instances are
/// fully independent, and ignore each other's subscription handles.
pub struct EventBus {
    bus: BusId,
    registry: Arc<RwLock<Registry>>,
    next_id: Arc<AtomicU64>,
    config: BusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            bus: BusId::next(),
            registry: Arc::new(RwLock::new(Registry::default())),
            next_id: Arc::new(AtomicU64::new(1)),
            config,
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Subscribe to `T` at the default priority
    pub fn subscribe<T: ?Sized + Event>(
        &self,
        handler: impl Fn(&T) -> HandlerResult + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe_handler(&super::handler::<T>(handler), DEFAULT_PRIORITY)
    }

    /// Subscribe to `T`; higher priorities run first
    pub fn subscribe_with_priority<T: ?Sized + Event>(
        &self,
        priority: i32,
        handler: impl Fn(&T) -> HandlerResult + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe_handler(&super::handler::<T>(handler), priority)
    }

    /// Register a shared handler. Each call adds an independent registration.
    pub fn subscribe_handler<T: ?Sized + Event>(
        &self,
        handler: &Handler<T>,
        priority: i32,
    ) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let key = TypeId::of::<T>();
        let event_type = type_name::<T>();

        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        registry.insert(
            key,
            Registration {
                id,
                priority,
                event_type,
                handler: Box::new(Arc::clone(handler)),
            },
        );
        drop(registry);

        tracing::trace!(subscription = %id, event_type, priority, "subscribed");
        Subscription::new(self.bus, id, priority, key, event_type)
    }

    /// Remove the registration a handle names.
    ///
    /// Unknown handles, and handles issued by another bus, are a no-op.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        if subscription.bus() != self.bus {
            tracing::debug!(subscription = %subscription.id, "handle from another bus ignored");
            return false;
        }
        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let removed = registry.remove(subscription);
        drop(registry);

        if removed {
            tracing::trace!(
                subscription = %subscription.id,
                event_type = subscription.event_type(),
                "unsubscribed"
            );
        }
        removed
    }

    /// Remove the earliest registration of this exact `Arc` under `T`
    pub fn unsubscribe_handler<T: ?Sized + Event>(&self, handler: &Handler<T>) -> bool {
        let mut registry = self.registry.write().unwrap_or_else(|e| e.into_inner());
        let removed = registry.remove_first(TypeId::of::<T>(), |registration| {
            registration
                .handler
                .downcast_ref::<Handler<T>>()
                .is_some_and(|registered| Arc::ptr_eq(registered, handler))
        });
        drop(registry);

        match removed {
            Some(id) => {
                tracing::trace!(subscription = %id, event_type = type_name::<T>(), "unsubscribed");
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self, subscription: &Subscription) -> bool {
        subscription.bus() == self.bus
            && self
                .registry
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .contains(subscription)
    }

    /// Registrations keyed by exactly `T`
    pub fn handler_count<T: ?Sized + Event>(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .count(TypeId::of::<T>())
    }

    /// Registrations across all keys
    pub fn subscription_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .total()
    }

    /// Names of the types and capabilities that currently have handlers
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .type_names()
    }

    pub fn clear(&self) {
        self.registry
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        tracing::debug!("all subscriptions cleared");
    }

    /// Publish with the configured auto-dispose policy.
    ///
    /// Returns whether any handler was registered for the event.
    pub fn publish<E: Event>(&self, event: &E) -> Result<bool> {
        self.publish_with(event, PublishOptions::from(&self.config))
    }

    /// Deliver `event` synchronously on the calling thread.
    ///
    /// Handlers run one at a time, highest priority first, ties in
    /// subscribe order. Delivery stops as soon as the event is disposed.
    /// A handler error aborts delivery and is returned as
    /// [`BusError::Handler`]; the event is then left as the handlers left it.
    pub fn publish_with<E: Event>(&self, event: &E, options: PublishOptions) -> Result<bool> {
        ensure_live(event)?;

        let span = tracing::debug_span!(
            "bus.publish",
            event_type = event.type_name(),
            event_id = %event.id()
        );
        let _guard = span.enter();

        let caps = Capabilities::resolve(event);
        let deliveries = self.deliveries(&caps);
        let had_handlers = !deliveries.is_empty();
        let total = deliveries.len();

        for (index, delivery) in deliveries.into_iter().enumerate() {
            if is_disposed(event) {
                tracing::debug!(remaining = total - index, "event disposed, stopping delivery");
                break;
            }

            let registration = &delivery.registration;
            tracing::debug!(
                subscription = %registration.id,
                handler_type = registration.event_type,
                priority = registration.priority,
                "delivering"
            );
            match caps.invoke(delivery.capability, event, &*registration.handler) {
                Some(Ok(())) => {}
                Some(Err(source)) => {
                    tracing::debug!(subscription = %registration.id, error = %source, "handler failed");
                    return Err(BusError::Handler {
                        subscription: registration.id,
                        event_type: event.type_name(),
                        source,
                    });
                }
                None => {
                    tracing::warn!(subscription = %registration.id, "handler type mismatch, skipped");
                }
            }
        }

        if !had_handlers {
            tracing::debug!("no handlers");
        }
        finish(event, options);
        Ok(had_handlers)
    }

    /// Publish concurrently with the configured auto-dispose policy
    pub async fn publish_async<E: Event>(&self, event: Arc<E>) -> Result<DispatchReport> {
        self.publish_async_with(event, PublishOptions::from(&self.config))
            .await
    }

    /// Fan the event out to every resolved handler as independent units.
    ///
    /// Units carry no ordering guarantee. Each re-checks disposal just before
    /// calling its handler. Handler errors and panics are logged and counted,
    /// never returned. Completes once every unit has finished.
    pub async fn publish_async_with<E: Event>(
        &self,
        event: Arc<E>,
        options: PublishOptions,
    ) -> Result<DispatchReport> {
        ensure_live(event.as_ref())?;

        let span = tracing::debug_span!(
            "bus.publish_async",
            event_type = event.type_name(),
            event_id = %event.id()
        );

        async move {
            let caps = Arc::new(Capabilities::resolve(event.as_ref()));
            let deliveries = self.deliveries(&caps);
            let mut report = DispatchReport {
                handlers: deliveries.len(),
                ..DispatchReport::default()
            };

            let mut units = JoinSet::new();
            for delivery in deliveries {
                let event = Arc::clone(&event);
                let caps = Arc::clone(&caps);
                let unit = move || run_unit(caps.as_ref(), event.as_ref(), delivery);
                if self.config.blocking_handlers {
                    units.spawn_blocking(unit);
                } else {
                    units.spawn(async move { unit() });
                }
            }

            while let Some(joined) = units.join_next().await {
                match joined {
                    Ok((_, UnitOutcome::Delivered)) => report.invoked += 1,
                    Ok((_, UnitOutcome::Skipped)) => report.skipped += 1,
                    Ok((subscription, UnitOutcome::Failed(error))) => {
                        report.invoked += 1;
                        report.faulted += 1;
                        tracing::error!(%subscription, error = %error, "async handler failed");
                    }
                    Ok((subscription, UnitOutcome::Panicked(message))) => {
                        report.invoked += 1;
                        report.faulted += 1;
                        tracing::error!(%subscription, panic = %message, "async handler panicked");
                    }
                    Err(error) => {
                        report.faulted += 1;
                        tracing::error!(error = %error, "async handler unit aborted");
                    }
                }
            }

            if !report.had_handlers() {
                tracing::debug!("no handlers");
            }
            finish(event.as_ref(), options);
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Snapshot every registration the event resolves to, in delivery order
    fn deliveries<E: Event>(&self, caps: &Capabilities<E>) -> Vec<Delivery> {
        let registry = self.registry.read().unwrap_or_else(|e| e.into_inner());
        let mut deliveries: Vec<Delivery> = Vec::new();
        for (capability, key) in caps.keys().enumerate() {
            deliveries.extend(registry.get(key).iter().map(|registration| Delivery {
                capability,
                registration: Arc::clone(registration),
            }));
        }
        drop(registry);

        deliveries.sort_by_key(|delivery| {
            (
                Reverse(delivery.registration.priority),
                delivery.registration.sequence(),
            )
        });
        deliveries
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus,
            registry: Arc::clone(&self.registry),
            next_id: Arc::clone(&self.next_id),
            config: self.config.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("EventBus")
            .field("types", &registry.key_count())
            .field("subscriptions", &registry.total())
            .field("config", &self.config)
            .finish()
    }
}

fn ensure_live<E: Event>(event: &E) -> Result<()> {
    if is_disposed(event) {
        return Err(BusError::Disposed {
            event_type: event.type_name(),
            id: event.id().clone(),
        });
    }
    Ok(())
}

fn finish<E: Event>(event: &E, options: PublishOptions) {
    if !options.auto_dispose {
        return;
    }
    if event.mark_disposed() {
        tracing::debug!("event disposed");
    }
}

fn run_unit<E: Event>(
    caps: &Capabilities<E>,
    event: &E,
    delivery: Delivery,
) -> (SubscriptionId, UnitOutcome) {
    let registration = &delivery.registration;
    if is_disposed(event) {
        return (registration.id, UnitOutcome::Skipped);
    }

    let handler: &(dyn Any + Send + Sync) = &*registration.handler;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        caps.invoke(delivery.capability, event, handler)
    }));
    let outcome = match outcome {
        Ok(Some(Ok(()))) => UnitOutcome::Delivered,
        Ok(Some(Err(error))) => UnitOutcome::Failed(error),
        Ok(None) => UnitOutcome::Skipped,
        Err(payload) => UnitOutcome::Panicked(panic_message(payload.as_ref())),
    };
    (registration.id, outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
