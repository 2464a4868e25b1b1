// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: CS_STATE_DIR > XDG_STATE_HOME/cloudspace > ~/.local/state/cloudspace
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("CS_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("cloudspace"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/cloudspace"))
}

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Kubernetes namespace for workspace pods and claims
pub fn namespace() -> String {
    std::env::var("CS_NAMESPACE")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "cloud-ide".to_string())
}

/// How long a create/start waits for the pod to become ready (default 30s)
pub fn ready_timeout() -> Duration {
    millis("CS_READY_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

/// Deadline for deleting a pod on stop (default 35s).
///
/// Must exceed the pod's termination grace period (30s by default) or a
/// successful delete is reported as a failure.
pub fn stop_timeout() -> Duration {
    millis("CS_STOP_TIMEOUT_MS").unwrap_or(Duration::from_secs(35))
}

/// Deadline for every other cluster API call (default 10s)
pub fn api_timeout() -> Duration {
    millis("CS_API_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
}

/// Where the storage claim is mounted inside the workspace container
pub fn mount_path() -> String {
    std::env::var("CS_MOUNT_PATH")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "/root/workspace".to_string())
}

/// Storage class for new claims; unset uses the cluster default
pub fn storage_class() -> Option<String> {
    std::env::var("CS_STORAGE_CLASS").ok().filter(|s| !s.is_empty())
}

/// TCP port for remote connections. When set, the daemon listens on this port
/// in addition to the Unix socket.
pub fn tcp_port() -> Option<u16> {
    std::env::var("CS_TCP_PORT").ok().and_then(|s| s.parse::<u16>().ok())
}

/// Auth token for TCP connections, validated in the Hello handshake.
pub fn auth_token() -> Option<String> {
    std::env::var("CS_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Default IPC timeout for reading requests and writing responses
pub fn ipc_timeout() -> Duration {
    millis("CS_IPC_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Shutdown grace on top of the longest lifecycle operation (default 5s)
pub fn drain_timeout() -> Duration {
    millis("CS_DRAIN_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
