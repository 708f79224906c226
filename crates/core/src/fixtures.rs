// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared event types for unit tests

use crate::capability::Capabilities;
use crate::event::{Disposal, Event, EventHeader};
use std::sync::{Arc, Mutex};

pub(crate) trait Named: Event {
    fn name(&self) -> &str;
}

pub(crate) trait Audited: Event {
    fn actor(&self) -> &str;
}

/// Plain event with no declared capabilities
#[derive(Debug, Clone)]
pub(crate) struct Ping {
    header: EventHeader,
    pub(crate) seq: u32,
}

impl Ping {
    pub(crate) fn new(seq: u32) -> Self {
        Self {
            header: EventHeader::new(),
            seq,
        }
    }
}

impl Event for Ping {
    fn header(&self) -> &EventHeader {
        &self.header
    }
}

/// Disposable event that is also `Named` and `Audited`
#[derive(Debug, Clone)]
pub(crate) struct Order {
    header: EventHeader,
    disposal: Disposal,
    pub(crate) name: String,
}

impl Order {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            header: EventHeader::new(),
            disposal: Disposal::new(),
            name: name.to_string(),
        }
    }
}

impl Event for Order {
    fn header(&self) -> &EventHeader {
        &self.header
    }

    fn disposal(&self) -> Option<&Disposal> {
        Some(&self.disposal)
    }

    fn capabilities(caps: &mut Capabilities<Self>) {
        caps.add::<dyn Named>(|event| event)
            .add::<dyn Audited>(|event| event);
    }
}

impl Named for Order {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Audited for Order {
    fn actor(&self) -> &str {
        "clerk"
    }
}

/// `Named` but not disposable
#[derive(Debug, Clone)]
pub(crate) struct Refund {
    header: EventHeader,
    pub(crate) name: String,
}

impl Refund {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            header: EventHeader::new(),
            name: name.to_string(),
        }
    }
}

impl Event for Refund {
    fn header(&self) -> &EventHeader {
        &self.header
    }

    fn capabilities(caps: &mut Capabilities<Self>) {
        caps.add::<dyn Named>(|event| event);
    }
}

impl Named for Refund {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Records handler calls in invocation order
#[derive(Clone, Default)]
pub(crate) struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, label: impl Into<String>) {
        self.0.lock().unwrap().push(label.into());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}
