//! Behavior when no daemon is listening.

use crate::prelude::*;

#[test]
fn ping_without_daemon_reports_not_running() {
    let dir = TempDir::new().unwrap();
    cli().args(&["ping"]).state_dir(dir.path()).fails().stderr_has("Daemon not running");
}

#[test]
fn status_without_daemon_reports_not_running() {
    let dir = TempDir::new().unwrap();
    cli()
        .args(&["status", "ws-1"])
        .state_dir(dir.path())
        .fails()
        .stderr_has("Daemon not running");
}

#[test]
fn daemon_stop_without_daemon_is_ok() {
    let dir = TempDir::new().unwrap();
    cli()
        .args(&["daemon", "stop"])
        .state_dir(dir.path())
        .passes()
        .stdout_has("Daemon not running");
}
