// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability declaration for concrete event types
//!
//! A concrete event type lists the capability traits it can be delivered as
//! by registering an upcast per trait:
//!
//! ```
//! use typebus::{Capabilities, Event, EventHeader};
//!
//! trait Named: Event {
//!     fn name(&self) -> &str;
//! }
//!
//! struct Greeting {
//!     header: EventHeader,
//!     name: String,
//! }
//!
//! impl Named for Greeting {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//! }
//!
//! impl Event for Greeting {
//!     fn header(&self) -> &EventHeader {
//!         &self.header
//!     }
//!
//!     fn capabilities(caps: &mut Capabilities<Self>) {
//!         caps.add::<dyn Named>(|event| event);
//!     }
//! }
//! ```
//!
//! No reflection is involved: the dispatcher walks this list on publish.

use crate::bus::{Handler, HandlerResult};
use crate::event::{Disposable, Event};
use std::any::{type_name, Any, TypeId};

type Invoke<E> =
    Box<dyn Fn(&E, &(dyn Any + Send + Sync)) -> Option<HandlerResult> + Send + Sync>;

/// One subscription key a concrete event type satisfies
struct Capability<E> {
    key: TypeId,
    name: &'static str,
    invoke: Invoke<E>,
}

/// Ordered set of subscription keys for the concrete event type `E`
pub struct Capabilities<E> {
    entries: Vec<Capability<E>>,
}

impl<E: Event> Capabilities<E> {
    /// Full key set of `event`: its type, the declared capabilities,
    /// `dyn Disposable` when it carries a disposal flag, then `dyn Event`
    pub(crate) fn resolve(event: &E) -> Self {
        let mut caps = Self {
            entries: Vec::new(),
        };
        caps.add::<E>(|event| event);
        E::capabilities(&mut caps);
        if event.disposal().is_some() {
            caps.add::<dyn Disposable>(|event| event);
        }
        caps.add::<dyn Event>(|event| event);
        caps
    }

    /// Declare that `E` can be delivered to handlers subscribed to `T`.
    ///
    /// Declaring the same key twice keeps the first upcast.
    pub fn add<T: ?Sized + Event>(&mut self, upcast: fn(&E) -> &T) -> &mut Self {
        let key = TypeId::of::<T>();
        if self.contains(key) {
            return self;
        }
        self.entries.push(Capability {
            key,
            name: type_name::<T>(),
            invoke: Box::new(
                move |event: &E, handler: &(dyn Any + Send + Sync)| -> Option<HandlerResult> {
                    let handler = handler.downcast_ref::<Handler<T>>()?;
                    Some(handler(upcast(event)))
                },
            ),
        });
        self
    }

    pub fn contains(&self, key: TypeId) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscription keys in resolution order
    pub fn keys(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Type names in resolution order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Run a type-erased handler against the capability at `index`.
    ///
    /// `None` means the handler was not registered for that key.
    pub(crate) fn invoke(
        &self,
        index: usize,
        event: &E,
        handler: &(dyn Any + Send + Sync),
    ) -> Option<HandlerResult> {
        self.entries
            .get(index)
            .and_then(|entry| (entry.invoke)(event, handler))
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
