// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cs - cloudspace CLI

mod client;
mod commands;
mod env;
mod exit_error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::DaemonClient;
use crate::commands::{daemon, workspace};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "cs",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"),
    about = "Manage cloud IDE workspaces on Kubernetes"
)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Talk to a remote daemon over TCP (host:port) instead of the local socket
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Auth token for the TCP handshake
    #[arg(long, env = "CS_AUTH_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision storage and compute for a new workspace
    Create(workspace::LaunchArgs),
    /// Bring a stopped workspace back up on its existing storage
    Start(workspace::LaunchArgs),
    /// Stop a workspace, keeping its storage
    Stop(workspace::NameArg),
    /// Delete a workspace's storage
    Delete(workspace::NameArg),
    /// Show whether a workspace is running
    Status(workspace::NameArg),
    /// Show where a running workspace can be reached
    Info(workspace::NameArg),
    /// Check that the daemon is up
    Ping,
    /// Daemon management
    Daemon(daemon::DaemonArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit) = e.downcast_ref::<ExitError>() {
                if !exit.message.is_empty() {
                    eprintln!("Error: {}", exit.message);
                }
                return ExitCode::from(u8::try_from(exit.code).unwrap_or(1));
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = match cli.addr {
        Some(addr) => DaemonClient::tcp(addr, cli.token),
        None => DaemonClient::local()?,
    };
    let format = cli.output;

    match cli.command {
        Commands::Create(args) => workspace::create(&client, args, format).await,
        Commands::Start(args) => workspace::start(&client, args, format).await,
        Commands::Stop(arg) => workspace::stop(&client, &arg.name, format).await,
        Commands::Delete(arg) => workspace::delete(&client, &arg.name, format).await,
        Commands::Status(arg) => workspace::status(&client, &arg.name, format).await,
        Commands::Info(arg) => workspace::info(&client, &arg.name, format).await,
        Commands::Ping => daemon::ping(&client, format).await,
        Commands::Daemon(args) => daemon::daemon(&client, args, format).await,
    }
}
