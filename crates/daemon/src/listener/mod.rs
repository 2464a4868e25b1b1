// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and handing
//! each one to its own task. Requests are answered one per connection.

mod workspaces;

use std::sync::Arc;
use std::time::{Duration, Instant};

use cs_wire::{self as wire, Request, Response, PROTOCOL_VERSION};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::orchestrator::Orchestrator;

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub orchestrator: Orchestrator,
    /// Notified when a client requests shutdown
    pub shutdown: Arc<Notify>,
    /// Auth token for TCP connections (from `CS_AUTH_TOKEN`).
    /// When set, TCP clients must provide this token in the Hello handshake.
    pub auth_token: Option<String>,
    /// Read/write deadline for request and response frames
    pub ipc_timeout: Duration,
    /// Connection and handler tasks, awaited on shutdown drain
    pub tasks: TaskTracker,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] wire::ProtocolError),

    #[error("Handler failed: {0}")]
    Handler(String),
}

impl Listener {
    /// Create a new listener with Unix socket only.
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp: None, ctx }
    }

    /// Create a new listener with both Unix socket and TCP.
    pub fn with_tcp(unix: UnixListener, tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp: Some(tcp), ctx }
    }

    /// Accept connections until `cancel` fires.
    ///
    /// Connections already accepted keep running after cancellation; wait on
    /// [`ListenCtx::tasks`] to drain them.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.unix.accept() => match result {
                    Ok((stream, _)) => {
                        let (reader, writer) = stream.into_split();
                        spawn_connection(reader, writer, ConnectionSource::Unix, &self.ctx);
                    }
                    Err(e) => error!("Unix accept error: {}", e),
                },
                result = accept_tcp(self.tcp.as_ref()) => match result {
                    Ok((stream, addr)) => {
                        debug!("TCP connection from {}", addr);
                        let (reader, writer) = stream.into_split();
                        spawn_connection(reader, writer, ConnectionSource::Tcp, &self.ctx);
                    }
                    Err(e) => error!("TCP accept error: {}", e),
                },
            }
        }
        self.ctx.tasks.close();
        debug!(in_flight = self.ctx.tasks.len(), "listener stopped accepting");
    }
}

async fn accept_tcp(
    tcp: Option<&TcpListener>,
) -> std::io::Result<(tokio::net::TcpStream, std::net::SocketAddr)> {
    match tcp {
        Some(tcp) => tcp.accept().await,
        None => std::future::pending().await,
    }
}

fn spawn_connection<R, W>(reader: R, writer: W, source: ConnectionSource, ctx: &Arc<ListenCtx>)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let conn_ctx = Arc::clone(ctx);
    ctx.tasks.spawn(async move {
        if let Err(e) = handle_connection(reader, writer, source, conn_ctx).await {
            log_connection_error(e);
        }
    });
}

/// Source of a connection (for auth decisions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionSource {
    /// Local Unix socket - trusted, no auth required.
    Unix,
    /// Remote TCP - requires auth token in Hello handshake.
    Tcp,
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(wire::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(wire::ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection.
///
/// The request handler runs in its own task so a panic is contained and
/// reported as an error response. If the client goes away first, lifecycle
/// requests keep running to completion; anything else is aborted.
pub(crate) async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    source: ConnectionSource,
    ctx: Arc<ListenCtx>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut request = wire::read_request(&mut reader, ctx.ipc_timeout).await?;

    // TCP connections must authenticate via Hello handshake as the first request,
    // then send the actual request on the same connection.
    if source == ConnectionSource::Tcp {
        let rejection = match request {
            Request::Hello { ref token, .. } => match (&ctx.auth_token, token) {
                (Some(expected), Some(provided)) if provided == expected => None,
                (Some(_), _) => Some("unauthorized"),
                // No auth_token configured on daemon - allow all TCP connections
                (None, _) => None,
            },
            _ => Some("TCP connections must start with Hello"),
        };
        if let Some(message) = rejection {
            warn!(%message, "rejecting TCP request");
            let response = Response::Error { message: message.to_string() };
            let _ = wire::write_response(&mut writer, &response, ctx.ipc_timeout).await;
            return Ok(());
        }

        let hello = Response::Hello { version: PROTOCOL_VERSION.to_string() };
        wire::write_response(&mut writer, &hello, ctx.ipc_timeout).await?;
        request = match wire::read_request(&mut reader, ctx.ipc_timeout).await {
            Ok(request) => request,
            // Handshake-only client
            Err(wire::ProtocolError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
    }

    info!(request = ?request, "received request");
    let kind = request_kind(&request);
    let lifecycle = request.is_lifecycle();
    let start = Instant::now();

    let mut handler = ctx.tasks.spawn(handle_request(request, Arc::clone(&ctx)));
    let response = tokio::select! {
        joined = &mut handler => match joined {
            Ok(response) => response,
            Err(e) if e.is_panic() => {
                error!(request = kind, "request handler panicked");
                Response::Error { message: "internal error".to_string() }
            }
            Err(e) => return Err(ConnectionError::Handler(e.to_string())),
        },
        _ = detect_client_disconnect(&mut reader) => {
            if lifecycle {
                info!(request = kind, "client disconnected, request continues");
            } else {
                handler.abort();
                debug!(request = kind, "client disconnected, cancelling handler");
            }
            return Ok(());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    if response.is_success() {
        info!(request = kind, elapsed_ms, "request completed");
    } else {
        warn!(request = kind, elapsed_ms, response = ?response, "request failed");
    }

    wire::write_response(&mut writer, &response, ctx.ipc_timeout).await?;
    Ok(())
}

/// Detect client disconnect by reading from the socket after the request.
///
/// In the request-response protocol, the client sends one request then waits.
/// If the client disconnects, reading returns 0 bytes (EOF).
async fn detect_client_disconnect<R: AsyncRead + Unpin>(reader: &mut R) {
    let mut buf = [0u8; 1];
    let _ = reader.read(&mut buf).await;
}

fn request_kind(request: &Request) -> &'static str {
    match request {
        Request::Ping => "ping",
        Request::Hello { .. } => "hello",
        Request::CreateWorkspace { .. } => "create",
        Request::StartWorkspace { .. } => "start",
        Request::StopWorkspace { .. } => "stop",
        Request::DeleteWorkspace { .. } => "delete",
        Request::WorkspaceStatus { .. } => "status",
        Request::WorkspaceInfo { .. } => "info",
        Request::Shutdown => "shutdown",
    }
}

/// Handle a single request and return a response.
async fn handle_request(request: Request, ctx: Arc<ListenCtx>) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version, token: _ } => {
            // Auth for TCP is checked in handle_connection before dispatch.
            if version != PROTOCOL_VERSION {
                debug!(client = %version, daemon = PROTOCOL_VERSION, "protocol version mismatch");
            }
            Response::Hello { version: PROTOCOL_VERSION.to_string() }
        }

        Request::CreateWorkspace { name, image, port, limits } => {
            workspaces::handle_create(&ctx, &name, image, port, limits).await
        }

        Request::StartWorkspace { name, image, port, limits } => {
            workspaces::handle_start(&ctx, &name, image, port, limits).await
        }

        Request::StopWorkspace { name } => workspaces::handle_stop(&ctx, &name).await,

        Request::DeleteWorkspace { name } => workspaces::handle_delete(&ctx, &name).await,

        Request::WorkspaceStatus { name } => workspaces::handle_status(&ctx, &name).await,

        Request::WorkspaceInfo { name } => workspaces::handle_info(&ctx, &name).await,

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
pub(crate) fn test_ctx(orchestrator: Orchestrator) -> ListenCtx {
    ListenCtx {
        orchestrator,
        shutdown: Arc::new(Notify::new()),
        auth_token: None,
        ipc_timeout: Duration::from_secs(5),
        tasks: TaskTracker::new(),
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
