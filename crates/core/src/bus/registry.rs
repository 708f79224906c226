// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of handler registrations keyed by subscription type

use super::subscription::{Subscription, SubscriptionId};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// One registered handler
pub(crate) struct Registration {
    pub(crate) id: SubscriptionId,
    pub(crate) priority: i32,
    pub(crate) event_type: &'static str,
    /// Boxed `Handler<T>` for the key the registration lives under
    pub(crate) handler: Box<dyn Any + Send + Sync>,
}

impl Registration {
    /// Registration ids are handed out in subscribe order
    pub(crate) fn sequence(&self) -> u64 {
        self.id.0
    }
}

/// Handler lists per subscription key.
///
/// Keys exist only while they hold at least one registration.
#[derive(Default)]
pub(crate) struct Registry {
    handlers: HashMap<TypeId, Vec<Arc<Registration>>>,
}

impl Registry {
    pub(crate) fn insert(&mut self, key: TypeId, registration: Registration) {
        self.handlers
            .entry(key)
            .or_default()
            .push(Arc::new(registration));
    }

    /// Registrations under `key`, in subscribe order
    pub(crate) fn get(&self, key: TypeId) -> &[Arc<Registration>] {
        self.handlers.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn contains(&self, subscription: &Subscription) -> bool {
        self.get(subscription.key())
            .iter()
            .any(|registration| registration.id == subscription.id)
    }

    /// Remove the registration a handle names
    pub(crate) fn remove(&mut self, subscription: &Subscription) -> bool {
        self.remove_first(subscription.key(), |registration| {
            registration.id == subscription.id
        })
        .is_some()
    }

    /// Remove the earliest registration under `key` matching `pred`
    pub(crate) fn remove_first(
        &mut self,
        key: TypeId,
        pred: impl Fn(&Registration) -> bool,
    ) -> Option<SubscriptionId> {
        let list = self.handlers.get_mut(&key)?;
        let index = list.iter().position(|registration| pred(registration))?;
        let removed = list.remove(index);
        if list.is_empty() {
            self.handlers.remove(&key);
        }
        Some(removed.id)
    }

    pub(crate) fn count(&self, key: TypeId) -> usize {
        self.get(key).len()
    }

    pub(crate) fn total(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .handlers
            .values()
            .filter_map(|list| list.first().map(|registration| registration.event_type))
            .collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn clear(&mut self) {
        self.handlers.clear();
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
