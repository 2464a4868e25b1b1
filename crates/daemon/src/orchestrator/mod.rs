// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace lifecycle orchestration.
//!
//! ```text
//! Absent ──► StorageProvisioning ──► ComputeCreating ──► AwaitingReady ──► Ready
//!  (create only)                          ▲                  │
//!                                         │                  ├──► TimedOut (unit deleted)
//!            Stopped (claim kept) ────────┘                  └──► Failed
//! ```
//!
//! Every create and start registers a readiness wait before the pod is
//! created, so a watcher that reports Running immediately cannot be missed.
//! Nothing here retries; failures surface to the caller after at most one
//! best-effort compensating delete.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cs_core::{SpaceInfo, WorkspaceName, WorkspaceSpec, WorkspaceStatus};
use thiserror::Error;

use crate::adapters::{ClusterApi, ClusterError};
use crate::readiness::{ReadinessRegistry, WaitError};

/// Deadlines for orchestration steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// How long a created pod may take to reach Running
    pub ready_timeout: Duration,
    /// Deadline for pod deletion on stop
    pub stop_timeout: Duration,
    /// Deadline for every other cluster call
    pub api_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(30),
            stop_timeout: Duration::from_secs(35),
            api_timeout: Duration::from_secs(10),
        }
    }
}

impl OrchestratorConfig {
    pub fn from_env() -> Self {
        Self {
            ready_timeout: crate::env::ready_timeout(),
            stop_timeout: crate::env::stop_timeout(),
            api_timeout: crate::env::api_timeout(),
        }
    }

    /// Upper bound on a single lifecycle operation.
    ///
    /// A create makes up to three cluster calls around the readiness wait
    /// (claim, pod, then info or compensating delete). A stop is one delete.
    pub fn longest_operation(&self) -> Duration {
        (self.ready_timeout + self.api_timeout * 3).max(self.stop_timeout)
    }
}

/// Errors from workspace lifecycle operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("storage provisioning failed for {name}: {source}")]
    StorageProvisioningFailed { name: WorkspaceName, source: ClusterError },

    #[error("compute creation failed for {name}: {reason}")]
    ComputeCreationFailed { name: WorkspaceName, reason: String },

    #[error("workspace {name} not ready after {}ms", .timeout.as_millis())]
    ReadinessTimeout { name: WorkspaceName, timeout: Duration },

    #[error("deletion failed for {name}: {source}")]
    DeletionFailed { name: WorkspaceName, source: ClusterError },

    #[error("workspace {0} not found")]
    NotFound(WorkspaceName),

    #[error("workspace {0} has no address yet")]
    NotReady(WorkspaceName),

    #[error("workspace {0} already has a creation in flight")]
    Conflict(WorkspaceName),

    #[error("orchestration failed for {name}: {source}")]
    Orchestration { name: WorkspaceName, source: ClusterError },
}

/// Drives workspace pods and storage claims through their lifecycle.
#[derive(Clone)]
pub struct Orchestrator {
    cluster: Arc<dyn ClusterApi>,
    registry: Arc<ReadinessRegistry>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        cluster: Arc<dyn ClusterApi>,
        registry: Arc<ReadinessRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Self { cluster, registry, config }
    }

    /// Provision storage, then create the pod and wait for it to run.
    ///
    /// An existing claim is reused. The claim size comes from
    /// `spec.limits.storage`.
    pub async fn create_workspace(&self, spec: &WorkspaceSpec) -> Result<SpaceInfo, WorkspaceError> {
        let name = &spec.name;
        match self
            .cluster
            .create_storage_claim(name, &spec.limits.storage, self.config.api_timeout)
            .await
        {
            Ok(()) => tracing::info!(workspace = %name, "storage claim created"),
            Err(ClusterError::AlreadyExists) => {
                tracing::debug!(workspace = %name, "storage claim already exists")
            }
            Err(source) => {
                return Err(WorkspaceError::StorageProvisioningFailed { name: name.clone(), source })
            }
        }
        self.create_and_await(spec).await
    }

    /// Create the pod over existing storage and wait for it to run.
    pub async fn start_workspace(&self, spec: &WorkspaceSpec) -> Result<SpaceInfo, WorkspaceError> {
        self.create_and_await(spec).await
    }

    /// Delete the pod, keeping its storage. A missing pod is success.
    pub async fn stop_workspace(&self, name: &WorkspaceName) -> Result<(), WorkspaceError> {
        match self.cluster.delete_compute_unit(name, self.config.stop_timeout).await {
            Ok(()) => {
                tracing::info!(workspace = %name, "compute unit deleted");
                Ok(())
            }
            Err(ClusterError::NotFound) => {
                tracing::debug!(workspace = %name, "compute unit already gone");
                Ok(())
            }
            Err(source) => Err(WorkspaceError::DeletionFailed { name: name.clone(), source }),
        }
    }

    /// Delete the storage claim. A missing claim is success.
    pub async fn delete_workspace(&self, name: &WorkspaceName) -> Result<(), WorkspaceError> {
        match self.cluster.delete_storage_claim(name, self.config.api_timeout).await {
            Ok(()) => {
                tracing::info!(workspace = %name, "storage claim deleted");
                Ok(())
            }
            Err(ClusterError::NotFound) => {
                tracing::debug!(workspace = %name, "storage claim already gone");
                Ok(())
            }
            Err(source) => Err(WorkspaceError::DeletionFailed { name: name.clone(), source }),
        }
    }

    /// Whether the pod exists, and its phase. Never waits for readiness.
    pub async fn workspace_status(
        &self,
        name: &WorkspaceName,
    ) -> Result<WorkspaceStatus, WorkspaceError> {
        match self.cluster.get_compute_unit(name, self.config.api_timeout).await {
            Ok(unit) => Ok(WorkspaceStatus::Exist { phase: unit.phase }),
            Err(ClusterError::NotFound) => Ok(WorkspaceStatus::NotExist),
            Err(source) => Err(WorkspaceError::Orchestration { name: name.clone(), source }),
        }
    }

    /// Placement and address of the pod.
    pub async fn workspace_info(&self, name: &WorkspaceName) -> Result<SpaceInfo, WorkspaceError> {
        match self.cluster.get_compute_unit(name, self.config.api_timeout).await {
            Ok(unit) => unit.space_info().ok_or_else(|| WorkspaceError::NotReady(name.clone())),
            Err(ClusterError::NotFound) => Err(WorkspaceError::NotFound(name.clone())),
            Err(source) => Err(WorkspaceError::Orchestration { name: name.clone(), source }),
        }
    }

    async fn create_and_await(&self, spec: &WorkspaceSpec) -> Result<SpaceInfo, WorkspaceError> {
        let name = &spec.name;
        let start = Instant::now();

        // Must precede the create call: the watcher may report Running
        // before create returns.
        let wait = self
            .registry
            .register(name)
            .map_err(|_| WorkspaceError::Conflict(name.clone()))?;

        match self.cluster.create_compute_unit(spec, self.config.api_timeout).await {
            Ok(()) => {}
            Err(ClusterError::AlreadyExists) => {
                drop(wait);
                return self.adopt_existing(name).await;
            }
            Err(e) => {
                return Err(WorkspaceError::ComputeCreationFailed {
                    name: name.clone(),
                    reason: e.to_string(),
                })
            }
        }
        tracing::info!(workspace = %name, image = %spec.image, "compute unit created, awaiting readiness");

        match wait.wait(self.config.ready_timeout).await {
            Ok(()) => {
                let info = self.workspace_info(name).await?;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                tracing::info!(workspace = %name, ip = %info.ip, elapsed_ms, "workspace ready");
                Ok(info)
            }
            Err(WaitError::TimedOut) => {
                tracing::warn!(
                    workspace = %name,
                    timeout_ms = self.config.ready_timeout.as_millis() as u64,
                    "workspace did not become ready"
                );
                self.compensate(name).await;
                Err(WorkspaceError::ReadinessTimeout {
                    name: name.clone(),
                    timeout: self.config.ready_timeout,
                })
            }
            Err(e @ WaitError::Abandoned) => {
                self.compensate(name).await;
                Err(WorkspaceError::ComputeCreationFailed {
                    name: name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Handle a create that found a pod already present.
    ///
    /// A Running pod is returned as-is. Anything else is stale: it is
    /// deleted and the create fails without retrying.
    async fn adopt_existing(&self, name: &WorkspaceName) -> Result<SpaceInfo, WorkspaceError> {
        let unit = match self.cluster.get_compute_unit(name, self.config.api_timeout).await {
            Ok(unit) => unit,
            Err(e) => {
                return Err(WorkspaceError::ComputeCreationFailed {
                    name: name.clone(),
                    reason: format!("compute unit exists but could not be read: {}", e),
                })
            }
        };

        if unit.phase.is_ready() {
            tracing::info!(workspace = %name, "compute unit already running");
            return unit.space_info().ok_or_else(|| WorkspaceError::NotReady(name.clone()));
        }

        tracing::warn!(workspace = %name, phase = %unit.phase, "deleting stale compute unit");
        self.compensate(name).await;
        Err(WorkspaceError::ComputeCreationFailed {
            name: name.clone(),
            reason: format!("stale compute unit in phase {} was deleted", unit.phase),
        })
    }

    /// Best-effort pod delete. Failures are logged, never returned.
    async fn compensate(&self, name: &WorkspaceName) {
        match self.cluster.delete_compute_unit(name, self.config.api_timeout).await {
            Ok(()) | Err(ClusterError::NotFound) => {}
            Err(e) => {
                tracing::warn!(workspace = %name, error = %e, "compensating delete failed")
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
