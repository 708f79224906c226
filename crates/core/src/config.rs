// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus configuration
//!
//! ```toml
//! # Dispose disposable events after publish unless overridden per call
//! auto_dispose = true
//! # Run async handlers on the blocking pool instead of as async tasks
//! blocking_handlers = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Default auto-dispose policy for `publish` and `publish_async`
    pub auto_dispose: bool,
    /// Schedule `publish_async` units with `spawn_blocking`
    pub blocking_handlers: bool,
}

impl BusConfig {
    pub fn new() -> Self {
        Self {
            auto_dispose: true,
            blocking_handlers: true,
        }
    }

    pub fn with_auto_dispose(mut self, auto_dispose: bool) -> Self {
        self.auto_dispose = auto_dispose;
        self
    }

    pub fn with_blocking_handlers(mut self, blocking_handlers: bool) -> Self {
        self.blocking_handlers = blocking_handlers;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
