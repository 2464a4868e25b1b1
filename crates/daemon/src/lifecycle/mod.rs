// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::{startup, Backend};

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::listener::{ListenCtx, Listener};
use crate::orchestrator::OrchestratorConfig;
use crate::readiness::ReadinessBridge;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/cloudspace)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Optional TCP port for remote clients
    pub tcp_port: Option<u16>,
    pub auth_token: Option<String>,
    pub namespace: String,
    /// Mount point of workspace storage inside the container
    pub mount_path: String,
    pub storage_class: Option<String>,
    pub ipc_timeout: Duration,
    /// Grace added to the longest lifecycle operation when draining
    pub drain_timeout: Duration,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Uses fixed paths under `~/.local/state/cloudspace/` (or
    /// `$XDG_STATE_HOME/cloudspace/`, or `$CS_STATE_DIR`).
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::at(crate::env::state_dir()?))
    }

    /// Configuration rooted at `state_dir`, other settings from the environment.
    pub fn at(state_dir: PathBuf) -> Self {
        Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            state_dir,
            tcp_port: crate::env::tcp_port(),
            auth_token: crate::env::auth_token(),
            namespace: crate::env::namespace(),
            mount_path: crate::env::mount_path(),
            storage_class: crate::env::storage_class(),
            ipc_timeout: crate::env::ipc_timeout(),
            drain_timeout: crate::env::drain_timeout(),
            orchestrator: OrchestratorConfig::from_env(),
        }
    }

    /// How long shutdown waits for in-flight requests.
    ///
    /// Long enough for a create that times out to finish its compensating
    /// delete and reply.
    pub fn drain_deadline(&self) -> Duration {
        self.orchestrator.longest_operation() + self.drain_timeout
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Context shared with every connection
    pub ctx: Arc<ListenCtx>,
    /// Entry point for the pod watcher
    pub bridge: ReadinessBridge,
    /// Notified when a client requests shutdown
    pub shutdown: Arc<Notify>,
    /// When daemon started
    pub start_time: Instant,
}

/// Result of daemon startup
pub struct StartupResult {
    pub daemon: DaemonState,
    /// Socket listener to spawn as a task
    pub listener: Listener,
    /// Pod API for the watcher; `None` when the cluster is not Kubernetes
    pub pods: Option<Api<Pod>>,
}

impl DaemonState {
    /// Remove runtime files. The lock is released when `self` is dropped.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!(uptime_secs = self.start_time.elapsed().as_secs(), "Shutting down daemon...");

        // 1. Remove socket file
        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        // 2. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 3. Remove version file
        if self.config.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.version_path) {
                warn!("Failed to remove version file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Failed to bind TCP port {0}: {1}")]
    TcpBindFailed(u16, std::io::Error),

    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
