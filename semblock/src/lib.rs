// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! Semantic block protocol subsystem for a VT-compatible terminal emulator.
//!
//! Recognises the OSC 133 shell-integration sequences, maintains a bounded
//! history of completed command blocks gated by DEC private mode 2034, and
//! answers the SBQUERY CSI sequence with a token-authenticated, DCS-wrapped
//! JSON reply. See [`dispatch::Dispatcher`] for the entry point that wires a
//! byte stream to all of this.

pub mod block;
pub mod config;
pub mod dispatch;
pub mod grid;
pub mod query;
pub mod shell_integration;
pub mod token;
pub mod tracker;
pub mod wire;


pub use block::CommandBlockInfo;
pub use config::{ConfigError, TrackerConfig};
pub use dispatch::Dispatcher;
pub use grid::{LineFlag, LineFlagSink, LineFlags};
pub use query::{QueryRequest, QueryResponse, QueryStatus, QueryType};
pub use shell_integration::{NullSink, ShellIntegrationSink};
pub use token::{OsTokenSource, Token, TokenSource};
pub use tracker::BlockTracker;
