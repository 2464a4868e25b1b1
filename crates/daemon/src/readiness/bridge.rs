// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingress from the pod watcher into the readiness registry.

use std::sync::Arc;

use cs_core::WorkspaceName;

use super::ReadinessRegistry;

/// Translates "pod became Running" observations into registry signals.
///
/// Safe to call redundantly: a transition observed twice, after the waiter
/// timed out, or for a pod nobody is waiting on is silently dropped.
#[derive(Clone)]
pub struct ReadinessBridge {
    registry: Arc<ReadinessRegistry>,
}

impl ReadinessBridge {
    pub fn new(registry: Arc<ReadinessRegistry>) -> Self {
        Self { registry }
    }

    /// Report that the workspace's pod reached the Running phase.
    ///
    /// Returns `true` if a pending wait was woken.
    pub fn notify_ready(&self, name: &WorkspaceName) -> bool {
        match self.registry.signal(name) {
            Ok(()) => {
                tracing::info!(workspace = %name, "readiness delivered");
                true
            }
            Err(_) => {
                tracing::debug!(workspace = %name, "ready pod has no pending wait");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
