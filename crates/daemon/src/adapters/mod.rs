// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for external I/O

pub mod cluster;

pub use cluster::{ClusterApi, ClusterError, ComputeUnit, KubeCluster};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use cluster::{ClusterCall, ClusterOp, FakeCluster};
