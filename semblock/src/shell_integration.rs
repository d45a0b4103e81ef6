// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! The OSC 133 shell-integration sink: parses subcommands, drives the
//! tracker, sets line flags, and forwards to the external callback.

use crate::grid::{LineFlag, LineFlagSink};
use crate::tracker::BlockTracker;

/// The parallel consumer alongside the tracker — forwards every recognised
/// shell-integration event, independent of whether the tracker is enabled.
pub trait ShellIntegrationSink {
    fn prompt_start(&mut self, click_events: bool);
    fn prompt_end(&mut self);
    fn command_output_start(&mut self, cmdline_url: Option<&str>);
    fn command_finished(&mut self, exit_code: i32);
}

/// A [`ShellIntegrationSink`] that does nothing, for callers who only want
/// the tracker and have no external shell-integration consumer installed.
#[derive(Debug, Default)]
pub struct NullSink;

impl ShellIntegrationSink for NullSink {
    fn prompt_start(&mut self, _click_events: bool) {}
    fn prompt_end(&mut self) {}
    fn command_output_start(&mut self, _cmdline_url: Option<&str>) {}
    fn command_finished(&mut self, _exit_code: i32) {}
}

/// Dispatches one already-unwrapped `OSC 133;<subcmd>[;<args>]` payload
/// (the part after `133;`) to the tracker, line-flag sink, and callback.
///
/// Subcommands other than `A`/`B`/`C`/`D` are not this core's concern and are
/// ignored here; a full terminal would forward the raw payload to its own
/// OSC router for them.
pub fn dispatch_osc_133(
    payload: &str,
    tracker: &mut BlockTracker,
    lines: &mut dyn LineFlagSink,
    sink: &mut dyn ShellIntegrationSink,
) {
    let mut parts = payload.splitn(2, ';');
    let subcommand = parts.next().unwrap_or("");
    let args = parts.next();

    match subcommand {
        "A" => prompt_start(args, tracker, lines, sink),
        "B" => {
            tracing::trace!("OSC 133;B prompt end forwarded, no tracker action");
            sink.prompt_end();
        }
        "C" => command_output_start(args, tracker, lines, sink),
        "D" => command_finished(args, tracker, lines, sink),
        other => tracing::trace!(subcommand = other, "unrecognised OSC 133 subcommand ignored"),
    }
}

/// `CSI > M` (SETMARK): equivalent to `OSC 133;A` with no click events.
pub fn dispatch_setmark(tracker: &mut BlockTracker, lines: &mut dyn LineFlagSink, sink: &mut dyn ShellIntegrationSink) {
    mark_prompt_start(false, tracker, lines, sink);
}

fn prompt_start(
    args: Option<&str>,
    tracker: &mut BlockTracker,
    lines: &mut dyn LineFlagSink,
    sink: &mut dyn ShellIntegrationSink,
) {
    let click_events = args.is_some_and(|a| a.split(';').any(|kv| kv == "click_events=1"));
    mark_prompt_start(click_events, tracker, lines, sink);
}

fn mark_prompt_start(
    click_events: bool,
    tracker: &mut BlockTracker,
    lines: &mut dyn LineFlagSink,
    sink: &mut dyn ShellIntegrationSink,
) {
    lines.set_flag(LineFlag::Marked);
    sink.prompt_start(click_events);
    if tracker.is_enabled() {
        tracker.prompt_start();
    }
}

fn command_output_start(
    args: Option<&str>,
    tracker: &mut BlockTracker,
    lines: &mut dyn LineFlagSink,
    sink: &mut dyn ShellIntegrationSink,
) {
    let cmdline_url = args.and_then(|a| {
        a.split(';')
            .find_map(|kv| kv.strip_prefix("cmdline_url="))
    });
    let decoded = cmdline_url.map(percent_decode);

    if tracker.is_enabled() {
        lines.set_flag(LineFlag::OutputStart);
        tracker.command_output_start(decoded.clone());
    }
    sink.command_output_start(decoded.as_deref());
}

fn command_finished(
    args: Option<&str>,
    tracker: &mut BlockTracker,
    lines: &mut dyn LineFlagSink,
    sink: &mut dyn ShellIntegrationSink,
) {
    let exit_code = args
        .and_then(|a| a.split(';').next())
        .and_then(|code| code.parse::<i32>().ok())
        .unwrap_or(0);

    if tracker.is_enabled() {
        lines.set_flag(LineFlag::CommandEnd);
        tracker.command_finished(exit_code);
    }
    sink.command_finished(exit_code);
}

/// Decodes `%HH` escapes in `input`. A `%` not followed by two hex digits is
/// passed through literally rather than treated as a failure.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).and_then(|h| std::str::from_utf8(h).ok());
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
