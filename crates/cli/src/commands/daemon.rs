// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cs ping` and `cs daemon` - Daemon management commands

use anyhow::Result;
use clap::{Args, Subcommand};
use cs_wire::Request;

use crate::client::DaemonClient;
use crate::output::{print_response, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Ask the daemon to drain in-flight requests and exit
    Stop,
    /// Print the daemon's protocol version
    Version,
}

pub async fn daemon(client: &DaemonClient, args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Stop => stop(client, format).await,
        DaemonCommand::Version => version(client, format).await,
    }
}

pub async fn ping(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let response = client.send(&Request::Ping).await?;
    print_response("daemon", &response, format)
}

async fn stop(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match client.send(&Request::Shutdown).await {
        Ok(response) => print_response("daemon", &response, format),
        Err(e) if e.is_not_running() => {
            println!("Daemon not running");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn version(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let version = client.hello().await?;
    let response = cs_wire::Response::Hello { version };
    print_response("daemon", &response, format)
}
