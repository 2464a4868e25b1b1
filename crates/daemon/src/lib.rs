// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloudspace daemon library
//!
//! Workspace lifecycle orchestration over Kubernetes: the readiness registry,
//! the orchestrator that drives pods and storage claims, the pod watcher, and
//! the socket listener that exposes it all to the `cs` CLI.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod orchestrator;
pub mod readiness;
pub mod watcher;

pub use lifecycle::{Backend, Config, DaemonState, LifecycleError, StartupResult};
pub use orchestrator::{Orchestrator, OrchestratorConfig, WorkspaceError};
pub use readiness::{ReadinessBridge, ReadinessRegistry, ReadyWait, RegistryError, WaitError};
