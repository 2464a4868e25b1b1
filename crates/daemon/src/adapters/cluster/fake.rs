// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory cluster for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cs_core::{UnitPhase, WorkspaceName, WorkspaceSpec};
use parking_lot::Mutex;

use super::{ClusterApi, ClusterError, ComputeUnit};
use crate::readiness::ReadinessBridge;

/// Cluster operation, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterOp {
    CreateComputeUnit,
    GetComputeUnit,
    DeleteComputeUnit,
    CreateStorageClaim,
    DeleteStorageClaim,
}

/// Recorded cluster call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    CreateComputeUnit { name: String, image: String, port: u16 },
    GetComputeUnit { name: String },
    DeleteComputeUnit { name: String, deadline: Duration },
    CreateStorageClaim { name: String, size: String },
    DeleteStorageClaim { name: String },
}

#[derive(Default)]
struct FakeClusterState {
    units: HashMap<String, ComputeUnit>,
    claims: HashMap<String, String>,
    calls: Vec<ClusterCall>,
    failures: HashMap<ClusterOp, ClusterError>,
    ready_on_create: Option<ReadinessBridge>,
    next_ip: u8,
}

/// Fake cluster that stores pods and claims in memory.
///
/// New pods start `Pending` unless [`FakeCluster::ready_on_create`] is set, in
/// which case they start `Running` and the bridge is notified from inside the
/// create call, the way a fast watcher would.
#[derive(Clone, Default)]
pub struct FakeCluster {
    inner: Arc<Mutex<FakeClusterState>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark new pods Running and notify `bridge` as soon as they are created.
    pub fn ready_on_create(self, bridge: ReadinessBridge) -> Self {
        self.inner.lock().ready_on_create = Some(bridge);
        self
    }

    /// Make every call of `op` fail with `err` until cleared.
    pub fn fail(&self, op: ClusterOp, err: ClusterError) {
        self.inner.lock().failures.insert(op, err);
    }

    pub fn clear_failure(&self, op: ClusterOp) {
        self.inner.lock().failures.remove(&op);
    }

    /// Seed an existing pod.
    pub fn insert_unit(&self, unit: ComputeUnit) {
        self.inner.lock().units.insert(unit.name.to_string(), unit);
    }

    /// Seed an existing storage claim.
    pub fn insert_claim(&self, name: &str, size: &str) {
        self.inner.lock().claims.insert(name.to_string(), size.to_string());
    }

    /// Move an existing pod to Running with an address, as the scheduler would.
    pub fn mark_running(&self, name: &str) {
        let mut state = self.inner.lock();
        let ip = next_ip(&mut state);
        if let Some(unit) = state.units.get_mut(name) {
            unit.phase = UnitPhase::Running;
            unit.node_name = Some("node-1".to_string());
            unit.ip = Some(ip);
        }
    }

    pub fn unit(&self, name: &str) -> Option<ComputeUnit> {
        self.inner.lock().units.get(name).cloned()
    }

    pub fn claim(&self, name: &str) -> Option<String> {
        self.inner.lock().claims.get(name).cloned()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ClusterCall> {
        self.inner.lock().calls.clone()
    }

    /// Names passed to `delete_compute_unit`, in order
    pub fn deleted_units(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ClusterCall::DeleteComputeUnit { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    fn begin(&self, op: ClusterOp, call: ClusterCall) -> Result<(), ClusterError> {
        let mut state = self.inner.lock();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn next_ip(state: &mut FakeClusterState) -> String {
    state.next_ip = state.next_ip.wrapping_add(1);
    format!("10.0.0.{}", state.next_ip)
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn create_compute_unit(
        &self,
        spec: &WorkspaceSpec,
        _deadline: Duration,
    ) -> Result<(), ClusterError> {
        self.begin(
            ClusterOp::CreateComputeUnit,
            ClusterCall::CreateComputeUnit {
                name: spec.name.to_string(),
                image: spec.image.clone(),
                port: spec.port,
            },
        )?;

        let bridge = {
            let mut state = self.inner.lock();
            if state.units.contains_key(spec.name.as_str()) {
                return Err(ClusterError::AlreadyExists);
            }
            let bridge = state.ready_on_create.clone();
            let (phase, node_name, ip) = match bridge {
                Some(_) => (UnitPhase::Running, Some("node-1".to_string()), Some(next_ip(&mut state))),
                None => (UnitPhase::Pending, None, None),
            };
            state.units.insert(
                spec.name.to_string(),
                ComputeUnit { name: spec.name.clone(), phase, node_name, ip, port: Some(spec.port) },
            );
            bridge
        };

        if let Some(bridge) = bridge {
            bridge.notify_ready(&spec.name);
        }
        Ok(())
    }

    async fn get_compute_unit(
        &self,
        name: &WorkspaceName,
        _deadline: Duration,
    ) -> Result<ComputeUnit, ClusterError> {
        self.begin(ClusterOp::GetComputeUnit, ClusterCall::GetComputeUnit { name: name.to_string() })?;
        self.unit(name).ok_or(ClusterError::NotFound)
    }

    async fn delete_compute_unit(
        &self,
        name: &WorkspaceName,
        deadline: Duration,
    ) -> Result<(), ClusterError> {
        self.begin(
            ClusterOp::DeleteComputeUnit,
            ClusterCall::DeleteComputeUnit { name: name.to_string(), deadline },
        )?;
        match self.inner.lock().units.remove(name.as_str()) {
            Some(_) => Ok(()),
            None => Err(ClusterError::NotFound),
        }
    }

    async fn create_storage_claim(
        &self,
        name: &WorkspaceName,
        size: &str,
        _deadline: Duration,
    ) -> Result<(), ClusterError> {
        self.begin(
            ClusterOp::CreateStorageClaim,
            ClusterCall::CreateStorageClaim { name: name.to_string(), size: size.to_string() },
        )?;
        let mut state = self.inner.lock();
        if state.claims.contains_key(name.as_str()) {
            return Err(ClusterError::AlreadyExists);
        }
        state.claims.insert(name.to_string(), size.to_string());
        Ok(())
    }

    async fn delete_storage_claim(
        &self,
        name: &WorkspaceName,
        _deadline: Duration,
    ) -> Result<(), ClusterError> {
        self.begin(
            ClusterOp::DeleteStorageClaim,
            ClusterCall::DeleteStorageClaim { name: name.to_string() },
        )?;
        match self.inner.lock().claims.remove(name.as_str()) {
            Some(_) => Ok(()),
            None => Err(ClusterError::NotFound),
        }
    }
}
