// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client: one request per connection over the Unix socket or TCP.

use std::path::PathBuf;
use std::time::Duration;

use cs_wire::{ProtocolError, Request, Response, PROTOCOL_VERSION};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};

/// Deadline for requests that answer immediately
const IPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for create/start, which wait on the daemon's readiness timeout
/// plus its cluster calls.
const LIFECYCLE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Could not determine state directory (set CS_STATE_DIR or HOME)")]
    NoStateDir,

    #[error("Rejected by daemon: {0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_not_running(&self) -> bool {
        matches!(self, ClientError::DaemonNotRunning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    Unix(PathBuf),
    Tcp { addr: String, token: Option<String> },
}

/// Connection target for the daemon.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    endpoint: Endpoint,
}

impl DaemonClient {
    /// Client for the local daemon socket in the state directory.
    pub fn local() -> Result<Self, ClientError> {
        let state_dir = crate::env::state_dir().ok_or(ClientError::NoStateDir)?;
        Ok(Self::unix(state_dir.join("daemon.sock")))
    }

    pub fn unix(socket_path: PathBuf) -> Self {
        Self { endpoint: Endpoint::Unix(socket_path) }
    }

    /// Client for a remote daemon; `token` is sent in the Hello handshake.
    pub fn tcp(addr: impl Into<String>, token: Option<String>) -> Self {
        Self { endpoint: Endpoint::Tcp { addr: addr.into(), token } }
    }

    /// Send one request and wait for its response.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let timeout = if request.is_lifecycle() { LIFECYCLE_TIMEOUT } else { IPC_TIMEOUT };
        match &self.endpoint {
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path).await.map_err(not_running)?;
                let (mut reader, mut writer) = stream.into_split();
                exchange(&mut reader, &mut writer, request, timeout).await
            }
            Endpoint::Tcp { addr, token } => {
                let stream = TcpStream::connect(addr.as_str()).await.map_err(not_running)?;
                let (mut reader, mut writer) = stream.into_split();
                let hello = Request::Hello {
                    version: PROTOCOL_VERSION.to_string(),
                    token: token.clone(),
                };
                let handshake = match exchange(&mut reader, &mut writer, &hello, IPC_TIMEOUT).await? {
                    response @ Response::Hello { .. } => response,
                    Response::Error { message } => return Err(ClientError::Rejected(message)),
                    _ => return Err(ClientError::UnexpectedResponse),
                };
                if matches!(request, Request::Hello { .. }) {
                    return Ok(handshake);
                }
                exchange(&mut reader, &mut writer, request, timeout).await
            }
        }
    }

    /// Daemon version, via the Hello handshake.
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello { version: PROTOCOL_VERSION.to_string(), token: None };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

async fn exchange<R, W>(
    reader: &mut R,
    writer: &mut W,
    request: &Request,
    timeout: Duration,
) -> Result<Response, ClientError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    cs_wire::write_request(writer, request, IPC_TIMEOUT).await?;
    Ok(cs_wire::read_response(reader, timeout).await?)
}

fn not_running(e: std::io::Error) -> ClientError {
    match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused => {
            ClientError::DaemonNotRunning
        }
        _ => ClientError::Io(e),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
