// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cs_core::ResourceLimits;
use serde::{Deserialize, Serialize};

/// Request from CLI to daemon
///
/// Workspace names travel as plain strings and are validated by the daemon,
/// so a malformed name gets a failure response rather than a dropped frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello {
        version: String,
        /// Auth token for TCP connections (ignored for Unix socket)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// First-time provisioning: storage claim, then compute unit
    CreateWorkspace {
        name: String,
        image: String,
        port: u16,
        #[serde(default)]
        limits: ResourceLimits,
    },

    /// Re-provision the compute unit of a stopped workspace
    StartWorkspace {
        name: String,
        image: String,
        port: u16,
        #[serde(default)]
        limits: ResourceLimits,
    },

    /// Delete the compute unit, keeping storage
    StopWorkspace { name: String },

    /// Delete the storage claim
    DeleteWorkspace { name: String },

    /// Query whether a compute unit exists and its phase
    WorkspaceStatus { name: String },

    /// Query placement and address of a compute unit
    WorkspaceInfo { name: String },

    /// Request daemon shutdown
    Shutdown,
}

impl Request {
    /// Requests that drive workspace state transitions.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Request::CreateWorkspace { .. }
                | Request::StartWorkspace { .. }
                | Request::StopWorkspace { .. }
                | Request::DeleteWorkspace { .. }
        )
    }
}
