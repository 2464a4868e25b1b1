// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Readiness tracking for in-flight workspace creations.
//!
//! A request handler registers interest in a workspace before asking the
//! cluster to create its pod, then waits on the returned [`ReadyWait`]. The
//! pod watcher, running on an unrelated task, reports pods that reach the
//! Running phase through the [`ReadinessBridge`], which signals the matching
//! entry.
//!
//! ```text
//! handler:  register ──► create pod ──► wait (timeout) ──► drop (deregister)
//!                                         ▲
//! watcher:                 pod Running ──► bridge ──► signal
//! ```

mod bridge;

pub use bridge::ReadinessBridge;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cs_core::WorkspaceName;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors from registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A live wait already exists for this workspace
    #[error("readiness wait already pending for {0}")]
    Conflict(WorkspaceName),
    /// No live wait for this workspace (expected when a waiter gave up)
    #[error("no readiness wait pending for {0}")]
    NotFound(WorkspaceName),
}

/// Why a [`ReadyWait`] ended without a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    #[error("timed out waiting for readiness")]
    TimedOut,
    /// The entry was removed out from under the waiter
    #[error("readiness wait was deregistered")]
    Abandoned,
}

struct Entry {
    ticket: u64,
    tx: oneshot::Sender<()>,
}

/// Concurrent map from workspace name to a one-shot readiness signal.
///
/// All operations take one short lock on the map. Waiting happens on the
/// [`ReadyWait`] outside the lock, so a slow waiter never blocks a signal.
#[derive(Default)]
pub struct ReadinessRegistry {
    entries: Mutex<HashMap<WorkspaceName, Entry>>,
    next_ticket: AtomicU64,
}

impl ReadinessRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register interest in `name` becoming ready.
    ///
    /// Fails with [`RegistryError::Conflict`] while another wait for the same
    /// name is live. The returned handle deregisters itself when dropped.
    pub fn register(self: &Arc<Self>, name: &WorkspaceName) -> Result<ReadyWait, RegistryError> {
        let (tx, rx) = oneshot::channel();
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(name) {
            // A closed sender means its waiter vanished without cleaning up.
            if !existing.tx.is_closed() {
                return Err(RegistryError::Conflict(name.clone()));
            }
        }
        entries.insert(name.clone(), Entry { ticket, tx });
        drop(entries);

        Ok(ReadyWait { rx, registry: Arc::clone(self), name: name.clone(), ticket })
    }

    /// Deliver the single notification for `name`, consuming its entry.
    pub fn signal(&self, name: &WorkspaceName) -> Result<(), RegistryError> {
        let entry = self.entries.lock().remove(name);
        match entry {
            Some(entry) => {
                entry.tx.send(()).map_err(|_| RegistryError::NotFound(name.clone()))
            }
            None => Err(RegistryError::NotFound(name.clone())),
        }
    }

    /// Remove the entry for `name` if present. Idempotent.
    pub fn deregister(&self, name: &WorkspaceName) {
        self.entries.lock().remove(name);
    }

    /// Whether a wait is currently registered for `name`.
    pub fn is_pending(&self, name: &WorkspaceName) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove `name` only if it still belongs to the wait holding `ticket`.
    fn release(&self, name: &WorkspaceName, ticket: u64) {
        let mut entries = self.entries.lock();
        if entries.get(name).is_some_and(|e| e.ticket == ticket) {
            entries.remove(name);
        }
    }
}

/// Handle to a registered readiness wait.
///
/// Dropping the handle deregisters the entry on every exit path.
pub struct ReadyWait {
    rx: oneshot::Receiver<()>,
    registry: Arc<ReadinessRegistry>,
    name: WorkspaceName,
    ticket: u64,
}

impl ReadyWait {
    /// Wait for the readiness notification or `timeout`, whichever is first.
    ///
    /// A signal delivered before this is called is not lost. The entry is
    /// deregistered when this returns.
    pub async fn wait(mut self, timeout: Duration) -> Result<(), WaitError> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(WaitError::Abandoned),
            Err(_) => Err(WaitError::TimedOut),
        }
    }
}

impl Drop for ReadyWait {
    fn drop(&mut self) {
        self.registry.release(&self.name, self.ticket);
    }
}

impl std::fmt::Debug for ReadyWait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyWait").field("name", &self.name).field("ticket", &self.ticket).finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
