// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::adapters::{ClusterApi, KubeCluster};
use crate::listener::{ListenCtx, Listener};
use crate::orchestrator::Orchestrator;
use crate::readiness::{ReadinessBridge, ReadinessRegistry};

use super::{Config, DaemonState, LifecycleError, StartupResult};

/// Where the daemon sends cluster calls.
pub enum Backend {
    /// Kubernetes, using the ambient kubeconfig or in-cluster service account
    Kube,
    /// A prebuilt cluster; no pod watcher is started
    Static(Arc<dyn ClusterApi>),
}

/// Start the daemon
pub async fn startup(config: &Config, backend: Backend) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config, backend).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock -
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(
    config: &Config,
    backend: Backend,
) -> Result<StartupResult, LifecycleError> {
    // 1. Create state directory (needed for socket, lock, etc.)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    // 3. Write version file
    std::fs::write(&config.version_path, cs_wire::PROTOCOL_VERSION)?;

    // 4. Connect to the cluster
    let (cluster, pods): (Arc<dyn ClusterApi>, Option<Api<Pod>>) = match backend {
        Backend::Kube => {
            let client = kube::Client::try_default().await?;
            let kube = KubeCluster::new(client, config.namespace.clone())
                .with_mount_path(config.mount_path.clone())
                .with_storage_class(config.storage_class.clone());
            let pods = Api::namespaced(kube.client(), kube.namespace());
            info!(namespace = %config.namespace, "connected to Kubernetes");
            (Arc::new(kube), Some(pods))
        }
        Backend::Static(cluster) => (cluster, None),
    };

    // 5. Wire the core: one registry shared by the orchestrator and the bridge
    let registry = ReadinessRegistry::new();
    let bridge = ReadinessBridge::new(Arc::clone(&registry));
    let orchestrator = Orchestrator::new(cluster, registry, config.orchestrator);

    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ListenCtx {
        orchestrator,
        shutdown: Arc::clone(&shutdown),
        auth_token: config.auth_token.clone(),
        ipc_timeout: config.ipc_timeout,
        tasks: TaskTracker::new(),
    });

    // 6. Optional TCP listener
    let tcp = match config.tcp_port {
        Some(port) => {
            let tcp = TcpListener::bind(("0.0.0.0", port))
                .await
                .map_err(|e| LifecycleError::TcpBindFailed(port, e))?;
            info!(port, auth = config.auth_token.is_some(), "listening on TCP");
            Some(tcp)
        }
        None => None,
    };

    // 7. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let unix = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    let listener = match tcp {
        Some(tcp) => Listener::with_tcp(unix, tcp, Arc::clone(&ctx)),
        None => Listener::new(unix, Arc::clone(&ctx)),
    };

    info!("Daemon started");

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            ctx,
            bridge,
            shutdown,
            start_time: Instant::now(),
        },
        listener,
        pods,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove socket if we created it
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }

    // Remove version file
    if config.version_path.exists() {
        let _ = std::fs::remove_file(&config.version_path);
    }

    // Remove PID/lock file
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
