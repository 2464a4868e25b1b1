// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::time::Duration;

use super::*;
use crate::adapters::FakeCluster;
use cs_wire::{Request, Response};
use tempfile::tempdir;
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;

fn test_config(dir: &Path) -> Config {
    let mut config = Config::at(dir.to_path_buf());
    config.tcp_port = None;
    config.auth_token = None;
    config
}

fn fake() -> Backend {
    Backend::Static(Arc::new(FakeCluster::new()))
}

#[tokio::test]
async fn startup_writes_runtime_files() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let result = startup(&config, fake()).await.unwrap();

    assert!(config.socket_path.exists());
    assert_eq!(std::fs::read_to_string(&config.version_path).unwrap(), cs_wire::PROTOCOL_VERSION);
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert!(result.pods.is_none());
}

#[tokio::test]
async fn startup_lock_failed_does_not_remove_existing_files() {
    // Simulate a running daemon by holding the lock and creating its files.
    // A second startup attempt must fail without deleting anything.
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    std::fs::write(&config.socket_path, b"").unwrap();
    std::fs::write(&config.version_path, b"0.1.0").unwrap();

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)
        .unwrap();
    lock_file.lock_exclusive().unwrap();
    std::fs::write(&config.lock_path, b"12345").unwrap();

    match startup(&config, fake()).await {
        Err(LifecycleError::LockFailed(_)) => {}
        Err(e) => panic!("expected LockFailed, got: {e}"),
        Ok(_) => panic!("expected LockFailed, but startup succeeded"),
    }

    assert!(config.socket_path.exists(), "socket file must not be deleted on LockFailed");
    assert!(config.version_path.exists(), "version file must not be deleted on LockFailed");
    assert!(config.lock_path.exists(), "lock file must not be deleted on LockFailed");
}

#[tokio::test]
async fn bind_failure_cleans_up() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.socket_path = dir.path().join("missing").join("daemon.sock");

    match startup(&config, fake()).await {
        Err(LifecycleError::BindFailed(path, _)) => assert_eq!(path, config.socket_path),
        Err(e) => panic!("expected BindFailed, got: {e}"),
        Ok(_) => panic!("expected BindFailed, but startup succeeded"),
    }

    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
}

#[tokio::test]
async fn stale_socket_is_replaced() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::write(&config.socket_path, b"stale").unwrap();

    let _result = startup(&config, fake()).await.unwrap();
    // Now a live socket rather than the stale regular file
    assert!(config.socket_path.exists());
    assert!(!config.socket_path.is_file());
}

#[tokio::test]
async fn shutdown_removes_runtime_files() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let StartupResult { mut daemon, .. } = startup(&config, fake()).await.unwrap();
    daemon.shutdown().unwrap();

    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
}

#[tokio::test]
async fn started_daemon_answers_ping() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let StartupResult { daemon, listener, .. } = startup(&config, fake()).await.unwrap();

    let cancel = CancellationToken::new();
    let task = tokio::spawn(listener.run(cancel.clone()));

    let mut stream = UnixStream::connect(&config.socket_path).await.unwrap();
    let timeout = Duration::from_secs(5);
    cs_wire::write_request(&mut stream, &Request::Ping, timeout).await.unwrap();
    let response = cs_wire::read_response(&mut stream, timeout).await.unwrap();
    assert_eq!(response, Response::Pong);

    cancel.cancel();
    task.await.unwrap();
    tokio::time::timeout(timeout, daemon.ctx.tasks.wait()).await.unwrap();
}
