// Copyright (c) 2026 The Semblock Authors. Licensed under Apache License, Version 2.0.

//! SBQUERY (`CSI > Ps ; Pn [; T1;T2;T3;T4] b`) request parsing, dispatch,
//! and response assembly.

use serde::{Deserialize, Serialize};

use crate::block::CommandBlockInfo;
use crate::token::Token;
use crate::tracker::BlockTracker;

/// The semantic query kind carried by `Ps`, named per
/// `SBQueryType` in the original tracker rather than matched on bare
/// integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    LastCommand,
    LastN,
    InProgress,
    Unknown(u16),
}

impl QueryType {
    #[must_use]
    pub fn from_ps(ps: u16) -> Self {
        match ps {
            1 => QueryType::LastCommand,
            2 => QueryType::LastN,
            3 => QueryType::InProgress,
            other => QueryType::Unknown(other),
        }
    }
}

/// A parsed SBQUERY request, before authentication or dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query_type: QueryType,
    pub count: u32,
    pub token: Option<Token>,
}

impl QueryRequest {
    /// Parses the raw CSI parameter list (`Ps`, `Pn`, and optionally `T1..T4`).
    /// Returns `None` if fewer than the mandatory `Ps`/`Pn` pair is present.
    #[must_use]
    pub fn from_params(params: &[u16]) -> Option<Self> {
        let &[ps, pn, ref rest @ ..] = params else {
            return None;
        };
        let token = match rest {
            [t1, t2, t3, t4, ..] => Some(Token([*t1, *t2, *t3, *t4])),
            _ => None,
        };
        Some(Self {
            query_type: QueryType::from_ps(ps),
            count: u32::from(pn),
            token,
        })
    }
}

/// Wire status codes for a SBQUERY reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    NoData = 0,
    Success = 1,
    AuthRequired = 2,
    AuthFailed = 3,
}

impl QueryStatus {
    #[must_use]
    pub fn digit(self) -> u8 {
        self as u8
    }
}

/// The fully-resolved outcome of a query: a status and, for `Success`, the
/// JSON payload to embed in the DCS reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub status: QueryStatus,
    pub payload: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseBody {
    version: u8,
    blocks: Vec<ResponseBlock>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct ResponseBlock {
    command: Option<String>,
    #[serde(rename = "exitCode")]
    exit_code: i32,
    finished: bool,
}

impl From<&CommandBlockInfo> for ResponseBlock {
    fn from(block: &CommandBlockInfo) -> Self {
        Self {
            command: block.command_line.clone(),
            exit_code: block.exit_code,
            finished: block.finished,
        }
    }
}

/// Resolves a parsed [`QueryRequest`] against the tracker's current state,
/// following the five-step dispatch order from the protocol definition.
#[must_use]
pub fn resolve(tracker: &BlockTracker, request: &QueryRequest) -> QueryResponse {
    if !tracker.is_enabled() {
        return QueryResponse { status: QueryStatus::NoData, payload: None };
    }

    let Some(token) = request.token else {
        return QueryResponse { status: QueryStatus::AuthRequired, payload: None };
    };

    if !tracker.validate_token(&token) {
        return QueryResponse { status: QueryStatus::AuthFailed, payload: None };
    }

    let selected: Vec<&CommandBlockInfo> = match request.query_type {
        QueryType::LastCommand => tracker.completed_blocks().back().into_iter().collect(),
        QueryType::LastN => {
            let n = request.count as usize;
            let len = tracker.completed_blocks().len();
            tracker.completed_blocks().iter().skip(len.saturating_sub(n)).collect()
        }
        QueryType::InProgress => tracker.current_block().into_iter().collect(),
        QueryType::Unknown(_) => Vec::new(),
    };

    if selected.is_empty() {
        return QueryResponse { status: QueryStatus::NoData, payload: None };
    }

    let body = ResponseBody {
        version: 1,
        blocks: selected.into_iter().map(ResponseBlock::from).collect(),
    };
    let payload = serde_json::to_string(&body).expect("response body is always representable as JSON");
    QueryResponse { status: QueryStatus::Success, payload: Some(payload) }
}
