// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! The mode-gated command-block history state machine.

use std::collections::VecDeque;

use crate::block::CommandBlockInfo;
use crate::config::TrackerConfig;
use crate::token::{OsTokenSource, Token, TokenSource};

/// Tracks the currently-running command and a bounded history of completed
/// ones, gated by the enable state mirroring DEC private mode 2034.
///
/// All mutating operations are no-ops while disabled, except
/// [`BlockTracker::set_enabled`] itself.
pub struct BlockTracker {
    config: TrackerConfig,
    token_source: Box<dyn TokenSource + Send>,
    enabled: bool,
    token: Option<Token>,
    current: Option<CommandBlockInfo>,
    completed: VecDeque<CommandBlockInfo>,
}

impl std::fmt::Debug for BlockTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockTracker")
            .field("config", &self.config)
            .field("enabled", &self.enabled)
            .field("token", &self.token)
            .field("current", &self.current)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

impl Default for BlockTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl BlockTracker {
    /// Creates a disabled tracker with an empty history, using the OS RNG as
    /// its token source.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_token_source(config, Box::new(OsTokenSource))
    }

    /// Like [`BlockTracker::new`], but with an injected [`TokenSource`] —
    /// intended for deterministic tests.
    #[must_use]
    pub fn with_token_source(config: TrackerConfig, token_source: Box<dyn TokenSource + Send>) -> Self {
        Self {
            config,
            token_source,
            enabled: false,
            token: None,
            current: None,
            completed: VecDeque::new(),
        }
    }

    /// Enables or disables the tracker.
    ///
    /// Enabling mints a fresh token and discards any prior history.
    /// Disabling clears `current`, `completed`, and the token atomically.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            let token = self.token_source.generate();
            tracing::debug!(?token, "semantic block tracker enabled, history reset");
            self.enabled = true;
            self.token = Some(token);
            self.current = None;
            self.completed.clear();
        } else {
            tracing::debug!("semantic block tracker disabled, history cleared");
            self.enabled = false;
            self.token = None;
            self.current = None;
            self.completed.clear();
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.token
    }

    /// `true` iff the tracker is enabled and `candidate` matches the current
    /// session token.
    #[must_use]
    pub fn validate_token(&self, candidate: &Token) -> bool {
        self.enabled && self.token.as_ref() == Some(candidate)
    }

    /// Marks the start of a new prompt.
    ///
    /// If `current` is finished, it is archived into `completed` (evicting
    /// the oldest entry if at capacity). An unfinished `current` is dropped,
    /// not archived. Either way, a fresh empty block becomes `current`. No-op
    /// when disabled.
    pub fn prompt_start(&mut self) {
        if !self.enabled {
            return;
        }
        if let Some(finished) = self.current.take() {
            if finished.finished {
                if self.completed.len() >= self.config.max_blocks {
                    self.completed.pop_front();
                    tracing::trace!("completed-block history at capacity, evicted oldest");
                }
                self.completed.push_back(finished);
            } else {
                tracing::debug!("unfinished command block discarded on prompt start");
            }
        }
        self.current = Some(CommandBlockInfo::new());
    }

    /// Records the command line for the current block. Creates `current` if
    /// absent. No-op when disabled.
    pub fn command_output_start(&mut self, cmdline: Option<String>) {
        if !self.enabled {
            return;
        }
        let block = self.current.get_or_insert_with(CommandBlockInfo::new);
        block.command_line = cmdline;
    }

    /// Records the exit code and marks the current block finished. Creates
    /// `current` if absent. No-op when disabled.
    pub fn command_finished(&mut self, exit_code: i32) {
        if !self.enabled {
            return;
        }
        let block = self.current.get_or_insert_with(CommandBlockInfo::new);
        block.exit_code = exit_code;
        block.finished = true;
    }

    /// Completed blocks, oldest first.
    #[must_use]
    pub fn completed_blocks(&self) -> &VecDeque<CommandBlockInfo> {
        &self.completed
    }

    /// The in-progress block, if any.
    #[must_use]
    pub fn current_block(&self) -> Option<&CommandBlockInfo> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct FixedTokenSource(Vec<Token>);

    impl TokenSource for FixedTokenSource {
        fn generate(&mut self) -> Token {
            self.0.remove(0)
        }
    }

    fn tracker_with_tokens(max_blocks: usize, tokens: Vec<Token>) -> BlockTracker {
        BlockTracker::with_token_source(TrackerConfig { max_blocks }, Box::new(FixedTokenSource(tokens)))
    }

    #[test]
    fn starts_disabled_with_no_token() {
        let tracker = BlockTracker::default();
        assert!(!tracker.is_enabled());
        assert_eq!(tracker.token(), None);
    }

    #[test]
    fn enabling_mints_a_token() {
        let token = Token([1, 2, 3, 4]);
        let mut tracker = tracker_with_tokens(100, vec![token]);
        tracker.set_enabled(true);
        assert!(tracker.is_enabled());
        assert_eq!(tracker.token(), Some(token));
    }

    #[test]
    fn disabling_clears_everything() {
        let mut tracker = tracker_with_tokens(100, vec![Token([1, 1, 1, 1])]);
        tracker.set_enabled(true);
        tracker.prompt_start();
        tracker.command_finished(0);
        tracker.prompt_start();
        tracker.set_enabled(false);
        assert!(!tracker.is_enabled());
        assert_eq!(tracker.token(), None);
        assert_eq!(tracker.current_block(), None);
        assert!(tracker.completed_blocks().is_empty());
    }

    #[test]
    fn reenabling_mints_a_new_token_and_resets_history() {
        let t1 = Token([1, 1, 1, 1]);
        let t2 = Token([2, 2, 2, 2]);
        let mut tracker = tracker_with_tokens(100, vec![t1, t2]);
        tracker.set_enabled(true);
        tracker.prompt_start();
        tracker.command_finished(0);
        tracker.prompt_start();
        assert_eq!(tracker.completed_blocks().len(), 1);

        tracker.set_enabled(false);
        tracker.set_enabled(true);
        assert_eq!(tracker.token(), Some(t2));
        assert_ne!(t1, t2);
        assert!(tracker.completed_blocks().is_empty());
        assert_eq!(tracker.current_block(), None);
    }

    #[test]
    fn validate_token_requires_enabled_and_matching() {
        let token = Token([9, 9, 9, 9]);
        let mut tracker = tracker_with_tokens(100, vec![token]);
        assert!(!tracker.validate_token(&token));
        tracker.set_enabled(true);
        assert!(tracker.validate_token(&token));
        assert!(!tracker.validate_token(&Token([0, 0, 0, 0])));
    }

    #[test]
    fn operations_are_noop_while_disabled() {
        let mut tracker = BlockTracker::default();
        tracker.prompt_start();
        tracker.command_output_start(Some("ls".into()));
        tracker.command_finished(0);
        assert_eq!(tracker.current_block(), None);
        assert!(tracker.completed_blocks().is_empty());
    }

    #[test]
    fn finished_current_is_archived_on_next_prompt_start() {
        let mut tracker = tracker_with_tokens(100, vec![Token([1, 0, 0, 0])]);
        tracker.set_enabled(true);
        tracker.prompt_start();
        tracker.command_output_start(Some("ls -la".into()));
        tracker.command_finished(0);
        tracker.prompt_start();

        assert_eq!(tracker.completed_blocks().len(), 1);
        let archived = &tracker.completed_blocks()[0];
        assert_eq!(archived.command_line.as_deref(), Some("ls -la"));
        assert_eq!(archived.exit_code, 0);
        assert!(archived.finished);
        assert!(tracker.current_block().is_some());
        assert!(!tracker.current_block().unwrap().finished);
    }

    #[test]
    fn unfinished_current_is_dropped_not_archived_on_next_prompt_start() {
        let mut tracker = tracker_with_tokens(100, vec![Token([1, 0, 0, 0])]);
        tracker.set_enabled(true);
        tracker.prompt_start();
        tracker.command_output_start(Some("sleep 100".into()));
        tracker.prompt_start();

        assert!(tracker.completed_blocks().is_empty());
        assert!(tracker.current_block().is_some());
        assert!(!tracker.current_block().unwrap().finished);
    }

    #[test]
    fn completed_blocks_evict_oldest_over_capacity() {
        let mut tracker = tracker_with_tokens(2, vec![Token([1, 0, 0, 0])]);
        tracker.set_enabled(true);
        for i in 0..3 {
            tracker.prompt_start();
            tracker.command_output_start(Some(format!("cmd{i}")));
            tracker.command_finished(i);
        }
        tracker.prompt_start();

        let blocks = tracker.completed_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].command_line.as_deref(), Some("cmd1"));
        assert_eq!(blocks[1].command_line.as_deref(), Some("cmd2"));
    }

    #[test]
    fn exactly_max_blocks_plus_one_keeps_last_max_blocks_in_order() {
        let mut tracker = tracker_with_tokens(3, vec![Token([1, 0, 0, 0])]);
        tracker.set_enabled(true);
        for i in 0..4 {
            tracker.prompt_start();
            tracker.command_finished(i);
        }
        tracker.prompt_start();

        let blocks = tracker.completed_blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks.iter().map(|b| b.exit_code).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn command_output_start_creates_current_if_absent() {
        let mut tracker = tracker_with_tokens(100, vec![Token([1, 0, 0, 0])]);
        tracker.set_enabled(true);
        tracker.command_output_start(Some("ls".into()));
        assert_eq!(tracker.current_block().unwrap().command_line.as_deref(), Some("ls"));
    }

    #[test]
    fn repeated_command_finished_is_idempotent() {
        let mut tracker = tracker_with_tokens(100, vec![Token([1, 0, 0, 0])]);
        tracker.set_enabled(true);
        tracker.prompt_start();
        tracker.command_finished(7);
        tracker.command_finished(7);
        tracker.prompt_start();

        let blocks = tracker.completed_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].exit_code, 7);
        assert!(blocks[0].finished);
    }
}
