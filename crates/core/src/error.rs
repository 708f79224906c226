// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event bus

use crate::bus::{HandlerError, SubscriptionId};
use crate::id::EventId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller of publish
#[derive(Debug, Error)]
pub enum BusError {
    #[error("cannot publish a disposed event: {event_type} {id}")]
    Disposed {
        event_type: &'static str,
        id: EventId,
    },
    #[error("handler {subscription} failed on {event_type}: {source}")]
    Handler {
        subscription: SubscriptionId,
        event_type: &'static str,
        #[source]
        source: HandlerError,
    },
}

/// Errors loading a bus configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = BusError> = std::result::Result<T, E>;
