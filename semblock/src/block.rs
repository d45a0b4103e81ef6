// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! The per-command metadata record tracked across a shell command's
//! lifecycle.

use serde::{Deserialize, Serialize};

/// Metadata for a single shell command, from prompt-start to finish.
///
/// A block may have `finished == false` only while it is the tracker's
/// *current* block; every block in `completed_blocks()` has `finished ==
/// true` (see [`crate::tracker::BlockTracker`]'s invariants).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBlockInfo {
    /// The literal, percent-decoded command line, if the shell ever supplied
    /// one via `OSC 133;C;cmdline_url=...`.
    pub command_line: Option<String>,
    /// Exit code of the command; `-1` means "unknown" (no `OSC 133;D` yet).
    pub exit_code: i32,
    /// `true` only after `OSC 133;D` has been received for this block.
    pub finished: bool,
}

impl CommandBlockInfo {
    /// A freshly started block: no command line, unknown exit code, not
    /// finished.
    #[must_use]
    pub fn new() -> Self {
        Self {
            command_line: None,
            exit_code: -1,
            finished: false,
        }
    }
}
