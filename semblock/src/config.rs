// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! Construction-time configuration for the [`crate::tracker::BlockTracker`].

use thiserror::Error;

/// Tunables for a [`crate::tracker::BlockTracker`].
///
/// There is no filesystem or network configuration surface for this
/// subsystem: a terminal emulator wires this up once at startup, alongside
/// whatever config format it already uses for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Maximum number of completed command blocks retained at once.
    pub max_blocks: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { max_blocks: 100 }
    }
}

impl TrackerConfig {
    /// Validates this configuration, returning an error if `max_blocks == 0`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroMaxBlocks`] when `max_blocks` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_blocks == 0 {
            return Err(ConfigError::ZeroMaxBlocks);
        }
        Ok(())
    }
}

/// Configuration errors for [`TrackerConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_blocks` must be at least 1; a tracker with no room for history
    /// would silently drop every completed command.
    #[error("max_blocks must be >= 1")]
    ZeroMaxBlocks,
}
