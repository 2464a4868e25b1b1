// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace request handlers.
//!
//! Each handler validates the workspace name, calls the orchestrator, and
//! folds the outcome into a coarse status response.

use cs_core::{ResourceLimits, WorkspaceName, WorkspaceSpec, WorkspaceStatus};
use cs_wire::{Response, STATUS_EXIST, STATUS_NOT_EXIST};
use tracing::warn;

use super::ListenCtx;
use crate::orchestrator::WorkspaceError;

fn parse_name(name: &str) -> Result<WorkspaceName, String> {
    WorkspaceName::parse(name).map_err(|e| format!("invalid workspace name {:?}: {}", name, e))
}

fn build_spec(
    name: &str,
    image: String,
    port: u16,
    limits: ResourceLimits,
) -> Result<WorkspaceSpec, String> {
    let name = parse_name(name)?;
    if image.is_empty() {
        return Err("image is required".to_string());
    }
    if port == 0 {
        return Err("port must be non-zero".to_string());
    }
    Ok(WorkspaceSpec::new(name, image, port).limits(limits))
}

fn log_failure(name: &str, op: &str, err: &WorkspaceError) {
    warn!(workspace = name, op, error = %err, "workspace operation failed");
}

pub(super) async fn handle_create(
    ctx: &ListenCtx,
    name: &str,
    image: String,
    port: u16,
    limits: ResourceLimits,
) -> Response {
    let spec = match build_spec(name, image, port, limits) {
        Ok(spec) => spec,
        Err(message) => return Response::space_failed(message),
    };
    match ctx.orchestrator.create_workspace(&spec).await {
        Ok(info) => Response::space(info),
        Err(e) => {
            log_failure(name, "create", &e);
            Response::space_failed(e.to_string())
        }
    }
}

pub(super) async fn handle_start(
    ctx: &ListenCtx,
    name: &str,
    image: String,
    port: u16,
    limits: ResourceLimits,
) -> Response {
    let spec = match build_spec(name, image, port, limits) {
        Ok(spec) => spec,
        Err(message) => return Response::space_failed(message),
    };
    match ctx.orchestrator.start_workspace(&spec).await {
        Ok(info) => Response::space(info),
        Err(e) => {
            log_failure(name, "start", &e);
            Response::space_failed(e.to_string())
        }
    }
}

pub(super) async fn handle_stop(ctx: &ListenCtx, name: &str) -> Response {
    let ws = match parse_name(name) {
        Ok(ws) => ws,
        Err(message) => return Response::ack_failed(message),
    };
    match ctx.orchestrator.stop_workspace(&ws).await {
        Ok(()) => Response::ack_ok(),
        Err(e) => {
            log_failure(name, "stop", &e);
            Response::ack_failed(e.to_string())
        }
    }
}

pub(super) async fn handle_delete(ctx: &ListenCtx, name: &str) -> Response {
    let ws = match parse_name(name) {
        Ok(ws) => ws,
        Err(message) => return Response::ack_failed(message),
    };
    match ctx.orchestrator.delete_workspace(&ws).await {
        Ok(()) => Response::ack_ok(),
        Err(e) => {
            log_failure(name, "delete", &e);
            Response::ack_failed(e.to_string())
        }
    }
}

/// Status distinguishes "no pod" from "could not ask": the latter is an error
/// response, never a not-exist status.
pub(super) async fn handle_status(ctx: &ListenCtx, name: &str) -> Response {
    let ws = match parse_name(name) {
        Ok(ws) => ws,
        Err(message) => return Response::Error { message },
    };
    match ctx.orchestrator.workspace_status(&ws).await {
        Ok(WorkspaceStatus::NotExist) => Response::WorkspaceStatus {
            status: STATUS_NOT_EXIST,
            message: WorkspaceStatus::NotExist.to_string(),
        },
        Ok(status @ WorkspaceStatus::Exist { .. }) => {
            Response::WorkspaceStatus { status: STATUS_EXIST, message: status.to_string() }
        }
        Err(e) => {
            log_failure(name, "status", &e);
            Response::Error { message: e.to_string() }
        }
    }
}

pub(super) async fn handle_info(ctx: &ListenCtx, name: &str) -> Response {
    let ws = match parse_name(name) {
        Ok(ws) => ws,
        Err(message) => return Response::space_failed(message),
    };
    match ctx.orchestrator.workspace_info(&ws).await {
        Ok(info) => Response::space(info),
        Err(e) => Response::space_failed(e.to_string()),
    }
}

#[cfg(test)]
#[path = "workspaces_tests.rs"]
mod tests;
