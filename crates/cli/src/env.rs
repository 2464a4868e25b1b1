// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// Resolve state directory: CS_STATE_DIR > XDG_STATE_HOME/cloudspace > ~/.local/state/cloudspace
///
/// Must agree with the daemon, which binds its socket here.
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CS_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("cloudspace"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/cloudspace"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
