//! CLI help output specs
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn cs_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn cs_help_lists_workspace_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("create")
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("delete")
        .stdout_has("status")
        .stdout_has("info");
}

#[test]
fn cs_create_help_shows_flags() {
    cli()
        .args(&["create", "--help"])
        .passes()
        .stdout_has("--image")
        .stdout_has("--port")
        .stdout_has("--storage");
}

#[test]
fn cs_daemon_help_shows_subcommands() {
    cli().args(&["daemon", "--help"]).passes().stdout_has("stop").stdout_has("version");
}

#[test]
fn cs_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.");
}

#[test]
fn create_without_image_is_usage_error() {
    cli().args(&["create", "ws-1", "--port", "8080"]).fails().stderr_has("--image");
}
