// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cs create|start|stop|delete|status|info` - Workspace lifecycle commands

use anyhow::Result;
use clap::Args;
use cs_core::ResourceLimits;
use cs_wire::Request;

use crate::client::DaemonClient;
use crate::output::{print_response, OutputFormat};

#[derive(Args)]
pub struct NameArg {
    /// Workspace name
    pub name: String,
}

#[derive(Args)]
pub struct LaunchArgs {
    /// Workspace name
    pub name: String,

    /// Container image for the workspace
    #[arg(long)]
    pub image: String,

    /// Port the workspace container listens on
    #[arg(long)]
    pub port: u16,

    /// CPU limit (e.g. "2" or "500m")
    #[arg(long, default_value = "")]
    pub cpu: String,

    /// Memory limit (e.g. "4Gi")
    #[arg(long, default_value = "")]
    pub memory: String,

    /// Storage size for a new workspace (default 10Gi; ignored by start)
    #[arg(long, default_value = "")]
    pub storage: String,
}

impl LaunchArgs {
    fn limits(&self) -> ResourceLimits {
        ResourceLimits::new(&self.cpu, &self.memory).storage(&self.storage)
    }
}

pub async fn create(client: &DaemonClient, args: LaunchArgs, format: OutputFormat) -> Result<()> {
    let request = Request::CreateWorkspace {
        limits: args.limits(),
        name: args.name.clone(),
        image: args.image,
        port: args.port,
    };
    let response = client.send(&request).await?;
    print_response(&args.name, &response, format)
}

pub async fn start(client: &DaemonClient, args: LaunchArgs, format: OutputFormat) -> Result<()> {
    let request = Request::StartWorkspace {
        limits: ResourceLimits::new(&args.cpu, &args.memory),
        name: args.name.clone(),
        image: args.image,
        port: args.port,
    };
    let response = client.send(&request).await?;
    print_response(&args.name, &response, format)
}

pub async fn stop(client: &DaemonClient, name: &str, format: OutputFormat) -> Result<()> {
    let response = client.send(&Request::StopWorkspace { name: name.to_string() }).await?;
    print_response(name, &response, format)
}

pub async fn delete(client: &DaemonClient, name: &str, format: OutputFormat) -> Result<()> {
    let response = client.send(&Request::DeleteWorkspace { name: name.to_string() }).await?;
    print_response(name, &response, format)
}

pub async fn status(client: &DaemonClient, name: &str, format: OutputFormat) -> Result<()> {
    let response = client.send(&Request::WorkspaceStatus { name: name.to_string() }).await?;
    print_response(name, &response, format)
}

pub async fn info(client: &DaemonClient, name: &str, format: OutputFormat) -> Result<()> {
    let response = client.send(&Request::WorkspaceInfo { name: name.to_string() }).await?;
    print_response(name, &response, format)
}
