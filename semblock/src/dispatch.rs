// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! Wires a byte stream to the tracker, shell-integration sink, and query
//! responder via [`vte::Parser`] / [`vte::Perform`].
//!
//! This dispatcher recognises exactly the sequences this subsystem consumes
//! (OSC 133, `CSI > M`, DECSM/DECRM/DECRQM 2034, SBQUERY). Everything else —
//! cursor movement, SGR, scrolling, a general-purpose screen buffer — belongs
//! to the surrounding terminal emulator and is ignored here.

use vte::{Params, Perform};

use crate::grid::LineFlagSink;
use crate::query::{self, QueryRequest};
use crate::shell_integration::{self, ShellIntegrationSink};
use crate::tracker::BlockTracker;
use crate::wire;

const DECSET_2034: u16 = 2034;

/// Owns the VT parser and this subsystem's state, turning fed bytes into
/// reply bytes.
pub struct Dispatcher<L: LineFlagSink, S: ShellIntegrationSink> {
    parser: vte::Parser,
    performer: Performer<L, S>,
}

impl<L: LineFlagSink, S: ShellIntegrationSink> std::fmt::Debug for Dispatcher<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("tracker", &self.performer.tracker).finish_non_exhaustive()
    }
}

impl<L: LineFlagSink, S: ShellIntegrationSink> Dispatcher<L, S> {
    #[must_use]
    pub fn new(tracker: BlockTracker, lines: L, sink: S) -> Self {
        Self {
            parser: vte::Parser::new(),
            performer: Performer { tracker, lines, sink, out: Vec::new() },
        }
    }

    /// Feeds `bytes` through the parser and returns any reply bytes
    /// produced. Sequences are expected complete within a single call (no
    /// partial-sequence buffering across calls).
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<u8> {
        self.parser.advance(&mut self.performer, bytes);
        std::mem::take(&mut self.performer.out)
    }

    #[must_use]
    pub fn tracker(&self) -> &BlockTracker {
        &self.performer.tracker
    }
}

struct Performer<L: LineFlagSink, S: ShellIntegrationSink> {
    tracker: BlockTracker,
    lines: L,
    sink: S,
    out: Vec<u8>,
}

impl<L: LineFlagSink, S: ShellIntegrationSink> Perform for Performer<L, S> {
    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        let [head, rest @ ..] = params else { return };
        if *head != b"133" {
            return;
        }
        let payload = rest
            .iter()
            .map(|p| String::from_utf8_lossy(p))
            .collect::<Vec<_>>()
            .join(";");
        shell_integration::dispatch_osc_133(&payload, &mut self.tracker, &mut self.lines, &mut self.sink);
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        let is_private = intermediates.contains(&b'?');
        let is_extended = intermediates.contains(&b'>');
        let values: Vec<u16> = params.iter().map(|group| group.first().copied().unwrap_or(0)).collect();

        match (is_private, is_extended, intermediates.contains(&b'$'), action) {
            (true, false, false, 'h') if values.first() == Some(&DECSET_2034) => {
                self.tracker.set_enabled(true);
                if let Some(token) = self.tracker.token() {
                    self.out.extend(wire::mode_enabled_reply(token));
                }
            }
            (true, false, false, 'l') if values.first() == Some(&DECSET_2034) => {
                self.tracker.set_enabled(false);
            }
            (true, false, true, 'p') if values.first() == Some(&DECSET_2034) => {
                self.out.extend(wire::decrqm_reply(self.tracker.is_enabled()));
            }
            (false, true, false, 'M') if values.is_empty() => {
                shell_integration::dispatch_setmark(&mut self.tracker, &mut self.lines, &mut self.sink);
            }
            (false, true, false, 'b') => {
                if let Some(request) = QueryRequest::from_params(&values) {
                    let response = query::resolve(&self.tracker, &request);
                    self.out.extend(wire::sbquery_reply(response.status, response.payload.as_deref()));
                }
            }
            _ => tracing::trace!(%action, ?intermediates, "unrecognised CSI sequence ignored"),
        }
    }

    fn print(&mut self, _c: char) {}
    fn execute(&mut self, _byte: u8) {}
    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}
    fn put(&mut self, _byte: u8) {}
    fn unhook(&mut self) {}
    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}
