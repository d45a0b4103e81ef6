// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! A minimal seam onto the surrounding terminal's screen/grid model.
//!
//! This subsystem does not own a grid; it only needs to mark the active row
//! with a small, fixed set of flags. Real terminals plug their own screen
//! buffer in via [`LineFlagSink`].

/// A single per-line flag the shell-integration sink can set on the active
/// row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineFlag {
    /// The row is a prompt line (`OSC 133;A` or `CSI > M`).
    Marked,
    /// The row is the first line of command output (`OSC 133;C`).
    OutputStart,
    /// The row is where a command finished (`OSC 133;D`).
    CommandEnd,
}

impl LineFlag {
    fn bit(self) -> u8 {
        match self {
            LineFlag::Marked => 0b001,
            LineFlag::OutputStart => 0b010,
            LineFlag::CommandEnd => 0b100,
        }
    }
}

/// A bitset of [`LineFlag`]s for one row.
///
/// Three fixed flags do not warrant a `bitflags` dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineFlags(u8);

impl LineFlags {
    #[must_use]
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn set(&mut self, flag: LineFlag) {
        self.0 |= flag.bit();
    }

    #[must_use]
    pub fn contains(&self, flag: LineFlag) -> bool {
        self.0 & flag.bit() != 0
    }
}

/// The active row's line-flag receiver, as exposed by the surrounding
/// screen/grid model.
pub trait LineFlagSink {
    /// Sets `flag` on the currently active row.
    fn set_flag(&mut self, flag: LineFlag);
}

/// A [`LineFlagSink`] that records which flags were set, for tests.
#[derive(Debug, Default)]
pub struct RecordingLineFlagSink {
    pub flags: Vec<LineFlag>,
}

impl LineFlagSink for RecordingLineFlagSink {
    fn set_flag(&mut self, flag: LineFlag) {
        self.flags.push(flag);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_flags_contain_nothing() {
        let flags = LineFlags::empty();
        assert!(!flags.contains(LineFlag::Marked));
        assert!(!flags.contains(LineFlag::OutputStart));
        assert!(!flags.contains(LineFlag::CommandEnd));
    }

    #[test]
    fn set_is_independent_per_flag() {
        let mut flags = LineFlags::empty();
        flags.set(LineFlag::OutputStart);
        assert!(!flags.contains(LineFlag::Marked));
        assert!(flags.contains(LineFlag::OutputStart));
        assert!(!flags.contains(LineFlag::CommandEnd));
    }

    #[test]
    fn recording_sink_records_in_order() {
        let mut sink = RecordingLineFlagSink::default();
        sink.set_flag(LineFlag::Marked);
        sink.set_flag(LineFlag::CommandEnd);
        assert_eq!(sink.flags, vec![LineFlag::Marked, LineFlag::CommandEnd]);
    }
}
