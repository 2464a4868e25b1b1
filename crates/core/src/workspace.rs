// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace provisioning parameters and observed state.
//!
//! A workspace is one compute unit (pod) plus one durable storage claim, both
//! named after the [`WorkspaceName`]. The claim survives stop/start cycles;
//! the pod does not.

use serde::{Deserialize, Serialize};

use crate::WorkspaceName;

/// Resource limits for a workspace, in Kubernetes quantity syntax.
///
/// Empty strings mean "unset". Quantities are passed to the cluster verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub memory: String,
    /// Storage claim size; only used on first-time creation.
    #[serde(default)]
    pub storage: String,
}

impl ResourceLimits {
    pub fn new(cpu: impl Into<String>, memory: impl Into<String>) -> Self {
        Self { cpu: cpu.into(), memory: memory.into(), storage: String::new() }
    }

    crate::setters! {
        into {
            storage: String,
        }
    }
}

/// Everything needed to create a workspace's compute unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSpec {
    pub name: WorkspaceName,
    pub image: String,
    /// Port the workspace container listens on
    pub port: u16,
    pub limits: ResourceLimits,
}

impl WorkspaceSpec {
    pub fn new(name: WorkspaceName, image: impl Into<String>, port: u16) -> Self {
        Self { name, image: image.into(), port, limits: ResourceLimits::default() }
    }

    crate::setters! {
        set {
            limits: ResourceLimits,
        }
    }
}

/// Placement and address of a running workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceInfo {
    pub node_name: String,
    pub ip: String,
    pub port: u16,
}

/// Observed phase of a compute unit, mirroring the Kubernetes pod phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
    /// Marked for deletion; the pod may still report Running until it exits
    Terminating,
}

impl UnitPhase {
    /// Parse a pod phase string. Missing or unrecognized phases are `Unknown`.
    pub fn from_phase(phase: Option<&str>) -> Self {
        match phase {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Whether the unit is scheduled, running, and addressable.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Running)
    }
}

crate::simple_display! {
    UnitPhase {
        Pending => "Pending",
        Running => "Running",
        Succeeded => "Succeeded",
        Failed => "Failed",
        Unknown => "Unknown",
        Terminating => "Terminating",
    }
}

/// Result of a status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceStatus {
    /// No compute unit exists (never created, stopped, or rolled back)
    NotExist,
    /// A compute unit exists in the given phase
    Exist { phase: UnitPhase },
}

impl std::fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExist => f.write_str("NotExist"),
            Self::Exist { phase } => write!(f, "{}", phase),
        }
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
