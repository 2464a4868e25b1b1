// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering daemon responses for the terminal.

use clap::ValueEnum;
use cs_wire::{Response, STATUS_EXIST};

use crate::exit_error::ExitError;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One-line summary of a response, or the failure message.
pub fn render_text(name: &str, response: &Response) -> Result<String, String> {
    match response {
        Response::Pong => Ok("pong".to_string()),
        Response::Hello { version } => Ok(format!("daemon {}", version)),
        Response::ShuttingDown => Ok("daemon shutting down".to_string()),
        Response::Space { info: Some(info), .. } if response.is_success() => {
            let node = if info.node_name.is_empty() { "-" } else { info.node_name.as_str() };
            Ok(format!("{} running on {} at {}:{}", name, node, info.ip, info.port))
        }
        Response::Space { message, .. } | Response::Ack { message, .. }
            if !response.is_success() =>
        {
            Err(message.clone())
        }
        Response::Space { .. } => Err("daemon returned no address".to_string()),
        Response::Ack { message, .. } => Ok(format!("{}: {}", name, message)),
        Response::WorkspaceStatus { status, message } => {
            if *status == STATUS_EXIST {
                Ok(format!("{}: {}", name, message))
            } else {
                Ok(format!("{}: not found", name))
            }
        }
        Response::Error { message } => Err(message.clone()),
    }
}

/// Print a response; failures become an [`ExitError`] with code 1.
pub fn print_response(name: &str, response: &Response, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => match render_text(name, response) {
            Ok(line) => {
                println!("{}", line);
                Ok(())
            }
            Err(message) => Err(ExitError::failed(message).into()),
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
            if response.is_success() {
                Ok(())
            } else {
                Err(ExitError::silent().into())
            }
        }
    }
}
