// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event identity
//!
//! Every [`EventHeader`](crate::EventHeader) draws its id from an [`IdGen`]
//! exactly once, at construction. Production events use random UUIDs; tests
//! swap in [`SequentialIdGen`] so ids show up predictably in assertions and
//! log output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Globally unique identity of an event value
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of ids for newly created events
pub trait IdGen: Send + Sync {
    fn next(&self) -> EventId;
}

/// Random v4 UUIDs, the default for [`EventHeader::new`](crate::EventHeader::new)
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> EventId {
        EventId(uuid::Uuid::new_v4().hyphenated().to_string())
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... shared across clones
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: String,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("event")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> EventId {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        EventId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
