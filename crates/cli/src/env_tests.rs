// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    std::env::set_var("CS_STATE_DIR", "/tmp/cs-cli-state");
    assert_eq!(state_dir(), Some(PathBuf::from("/tmp/cs-cli-state")));
    std::env::remove_var("CS_STATE_DIR");
}

#[test]
#[serial]
fn state_dir_matches_daemon_resolution() {
    std::env::remove_var("CS_STATE_DIR");
    let original = std::env::var("XDG_STATE_HOME").ok();
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");

    let daemon = cs_daemon::env::state_dir().unwrap();
    assert_eq!(state_dir(), Some(daemon));

    match original {
        Some(v) => std::env::set_var("XDG_STATE_HOME", v),
        None => std::env::remove_var("XDG_STATE_HOME"),
    }
}
