// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::adapters::FakeCluster;
use cs_core::{WorkspaceName, WorkspaceSpec};
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn config_paths_live_under_state_dir() {
    let dir = tempdir().unwrap();
    let config = Config::at(dir.path().to_path_buf());

    assert_eq!(config.socket_path, dir.path().join("daemon.sock"));
    assert_eq!(config.lock_path, dir.path().join("daemon.pid"));
    assert_eq!(config.version_path, dir.path().join("daemon.version"));
    assert_eq!(config.log_path, dir.path().join("daemon.log"));
}

#[test]
#[serial]
fn config_load_honors_state_dir_override() {
    let dir = tempdir().unwrap();
    std::env::set_var("CS_STATE_DIR", dir.path());
    let config = Config::load();
    std::env::remove_var("CS_STATE_DIR");

    assert_eq!(config.unwrap().state_dir, dir.path());
}

#[test]
#[serial]
fn config_reads_deadlines_from_env() {
    std::env::set_var("CS_READY_TIMEOUT_MS", "1500");
    std::env::set_var("CS_DRAIN_TIMEOUT_MS", "250");
    let config = Config::at(PathBuf::from("/tmp/cs-test"));
    std::env::remove_var("CS_READY_TIMEOUT_MS");
    std::env::remove_var("CS_DRAIN_TIMEOUT_MS");

    assert_eq!(config.orchestrator.ready_timeout, Duration::from_millis(1500));
    assert_eq!(config.drain_timeout, Duration::from_millis(250));
    assert_eq!(config.orchestrator.stop_timeout, Duration::from_secs(35));
}

#[test]
fn lock_error_message_hints_running_daemon() {
    let err = LifecycleError::LockFailed(std::io::Error::new(std::io::ErrorKind::WouldBlock, "held"));
    assert!(err.to_string().contains("already running"));
}

#[test]
#[serial]
fn drain_deadline_outlasts_slowest_operation() {
    let mut config = Config::at(PathBuf::from("/tmp/cs-test"));
    config.drain_timeout = Duration::from_secs(5);
    config.orchestrator = OrchestratorConfig {
        ready_timeout: Duration::from_secs(30),
        stop_timeout: Duration::from_secs(35),
        api_timeout: Duration::from_secs(10),
    };
    assert_eq!(config.drain_deadline(), Duration::from_secs(65));

    config.orchestrator.stop_timeout = Duration::from_secs(90);
    assert_eq!(config.drain_deadline(), Duration::from_secs(95));
}

#[tokio::test(start_paused = true)]
#[serial]
async fn drain_lets_timed_out_create_clean_up() {
    let dir = tempdir().unwrap();
    let mut config = Config::at(dir.path().to_path_buf());
    config.tcp_port = None;
    config.orchestrator = OrchestratorConfig::default();

    let cluster = FakeCluster::new();
    let StartupResult { daemon, .. } =
        startup(&config, Backend::Static(Arc::new(cluster.clone()))).await.unwrap();

    let orchestrator = daemon.ctx.orchestrator.clone();
    daemon.ctx.tasks.spawn(async move {
        let spec = WorkspaceSpec::new(WorkspaceName::parse("ws-1").unwrap(), "ide:latest", 8080);
        orchestrator.create_workspace(&spec).await
    });
    daemon.ctx.tasks.close();

    let drained = tokio::time::timeout(config.drain_deadline(), daemon.ctx.tasks.wait()).await;
    assert!(drained.is_ok(), "drain gave up before the create finished");
    assert_eq!(cluster.deleted_units(), vec!["ws-1".to_string()]);
}
