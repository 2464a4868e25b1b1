// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cs-core: Core types shared by the cloudspace daemon and CLI

pub mod macros;

pub mod name;
pub mod workspace;

pub use name::{NameError, WorkspaceName};
pub use workspace::{ResourceLimits, SpaceInfo, UnitPhase, WorkspaceSpec, WorkspaceStatus};
