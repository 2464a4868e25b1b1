// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster resource adapters
//!
//! The orchestrator drives two external resources per workspace, both named
//! after the workspace:
//!
//! ```text
//! storage claim  - durable volume, created once, survives stop/start
//!      │
//!      └── compute unit  - the workspace pod, mounts the claim
//! ```
//!
//! Every call takes an explicit deadline and reports "not found" and
//! "already exists" as distinct outcomes so callers can treat them as
//! idempotent success. Nothing here retries.

pub(crate) mod k8s;

pub use k8s::KubeCluster;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ClusterCall, ClusterOp, FakeCluster};

use std::time::Duration;

use async_trait::async_trait;
use cs_core::{SpaceInfo, UnitPhase, WorkspaceName, WorkspaceSpec};
use thiserror::Error;

/// Errors from cluster API calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("resource not found")]
    NotFound,
    #[error("resource already exists")]
    AlreadyExists,
    #[error("cluster call exceeded {}ms deadline", .0.as_millis())]
    Timeout(Duration),
    #[error("cluster API error: {0}")]
    Api(String),
}

/// Observed state of a workspace pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeUnit {
    pub name: WorkspaceName,
    pub phase: UnitPhase,
    /// Node the pod is scheduled on
    pub node_name: Option<String>,
    /// Pod IP, once allocated
    pub ip: Option<String>,
    /// First declared container port
    pub port: Option<u16>,
}

impl ComputeUnit {
    /// Placement triple, if the pod is scheduled and addressable.
    pub fn space_info(&self) -> Option<SpaceInfo> {
        let ip = self.ip.as_ref().filter(|ip| !ip.is_empty())?;
        Some(SpaceInfo {
            node_name: self.node_name.clone().unwrap_or_default(),
            ip: ip.clone(),
            port: self.port?,
        })
    }
}

/// Resource-orchestration API consumed by the lifecycle orchestrator
#[async_trait]
pub trait ClusterApi: Send + Sync + 'static {
    /// Create the workspace pod with its storage claim mounted.
    async fn create_compute_unit(
        &self,
        spec: &WorkspaceSpec,
        deadline: Duration,
    ) -> Result<(), ClusterError>;

    /// Read the workspace pod.
    async fn get_compute_unit(
        &self,
        name: &WorkspaceName,
        deadline: Duration,
    ) -> Result<ComputeUnit, ClusterError>;

    /// Delete the workspace pod.
    async fn delete_compute_unit(
        &self,
        name: &WorkspaceName,
        deadline: Duration,
    ) -> Result<(), ClusterError>;

    /// Create the workspace storage claim with the requested size.
    async fn create_storage_claim(
        &self,
        name: &WorkspaceName,
        size: &str,
        deadline: Duration,
    ) -> Result<(), ClusterError>;

    /// Delete the workspace storage claim.
    async fn delete_storage_claim(
        &self,
        name: &WorkspaceName,
        deadline: Duration,
    ) -> Result<(), ClusterError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
