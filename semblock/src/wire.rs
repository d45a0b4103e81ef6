// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! Escape sequence constants and reply builders for the DCS and CSI replies
//! this subsystem emits.

use crate::query::QueryStatus;
use crate::token::Token;

const ESC: u8 = 0x1B;

/// `ESC P`, introducing a Device Control String.
const DCS_INTRODUCER: &[u8] = &[ESC, b'P'];
/// `ESC \`, the String Terminator.
const ST: &[u8] = &[ESC, b'\\'];

/// Builds the DCS reply sent when `DECSM ? 2034 h` enables the tracker:
/// `ESC P > 2034 ; 1 b T1;T2;T3;T4 ESC \`.
#[must_use]
pub fn mode_enabled_reply(token: Token) -> Vec<u8> {
    let [t1, t2, t3, t4] = token.parts();
    let mut out = Vec::new();
    out.extend_from_slice(DCS_INTRODUCER);
    out.extend_from_slice(format!(">2034;1b{t1};{t2};{t3};{t4}").as_bytes());
    out.extend_from_slice(ST);
    out
}

/// Builds the `DECRQM` reply for mode 2034: `CSI ? 2034 ; <1|2> $ y`.
#[must_use]
pub fn decrqm_reply(enabled: bool) -> Vec<u8> {
    let state = if enabled { 1 } else { 2 };
    format!("{}[?2034;{state}$y", ESC as char).into_bytes()
}

/// Builds a SBQUERY reply: `ESC P > <status> b [<json>] ESC \`.
#[must_use]
pub fn sbquery_reply(status: QueryStatus, payload: Option<&str>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(DCS_INTRODUCER);
    out.extend_from_slice(format!(">{}b", status.digit()).as_bytes());
    if let Some(payload) = payload {
        out.extend_from_slice(payload.as_bytes());
    }
    out.extend_from_slice(ST);
    out
}
