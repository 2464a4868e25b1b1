// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cs_core::SpaceInfo;
use serde::{Deserialize, Serialize};

/// Coarse status for a successful call
pub const STATUS_OK: u32 = 200;
/// Coarse status for a failed call
pub const STATUS_FAILED: u32 = 400;

/// Status query: no compute unit
pub const STATUS_NOT_EXIST: u32 = 0;
/// Status query: compute unit present
pub const STATUS_EXIST: u32 = 1;

/// Response from daemon to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Daemon is shutting down
    ShuttingDown,

    /// Outcome of a stop or delete
    Ack { status: u32, message: String },

    /// Outcome of a create, start, or info query
    Space {
        status: u32,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        info: Option<SpaceInfo>,
    },

    /// Outcome of a status query ([`STATUS_EXIST`] / [`STATUS_NOT_EXIST`])
    WorkspaceStatus { status: u32, message: String },

    /// Request could not be handled
    Error { message: String },
}

impl Response {
    pub fn ack_ok() -> Self {
        Response::Ack { status: STATUS_OK, message: "success".to_string() }
    }

    pub fn ack_failed(message: impl Into<String>) -> Self {
        Response::Ack { status: STATUS_FAILED, message: message.into() }
    }

    pub fn space(info: SpaceInfo) -> Self {
        Response::Space { status: STATUS_OK, message: "success".to_string(), info: Some(info) }
    }

    pub fn space_failed(message: impl Into<String>) -> Self {
        Response::Space { status: STATUS_FAILED, message: message.into(), info: None }
    }

    /// Whether the daemon reported success.
    ///
    /// Status queries succeed whether or not the workspace exists.
    pub fn is_success(&self) -> bool {
        match self {
            Response::Pong
            | Response::Hello { .. }
            | Response::ShuttingDown
            | Response::WorkspaceStatus { .. } => true,
            Response::Ack { status, .. } | Response::Space { status, .. } => *status == STATUS_OK,
            Response::Error { .. } => false,
        }
    }
}
