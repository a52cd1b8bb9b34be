//! CLI error handling specs

use crate::prelude::*;

#[test]
fn search_without_a_term_is_a_usage_error() {
    cli().args(&["search"]).fails().stderr_has("Usage:");
}

#[test]
fn repo_add_without_a_url_is_a_usage_error() {
    cli().args(&["repo", "add"]).fails().stderr_has("Usage:");
}

#[test]
fn gated_run_fails_fast_when_the_tool_is_missing() {
    let config = TestConfig::missing_tool();
    config
        .cli()
        .args(&["run", "Firefox.munki"])
        .fails()
        .stderr_has("requirements not met")
        .stderr_has("not installed");
}

#[test]
fn repo_update_fails_fast_when_the_tool_is_missing() {
    let config = TestConfig::missing_tool();
    config
        .cli()
        .args(&["repo", "update"])
        .fails()
        .stderr_has("requirements not met");
}

#[test]
fn search_fails_fast_when_the_tool_is_missing() {
    let config = TestConfig::missing_tool();
    config
        .cli()
        .args(&["search", "firefox"])
        .fails()
        .stderr_has("requirements not met")
        .stderr_has("not installed");
}

#[test]
fn malformed_settings_file_is_reported() {
    let config = TestConfig::with("recipes = 12\n");
    config
        .cli()
        .args(&["status"])
        .fails()
        .stderr_has("invalid settings");
}

#[test]
fn run_with_nothing_configured_is_rejected() {
    // No recipes on the command line and none in settings. The tool is
    // present as far as admission cares, but construction fails first.
    let config = TestConfig::with("recipes = []\n[tool]\nbinary = \"/bin/sh\"\nmin_version = \"\"\n");
    config
        .cli()
        .args(&["run"])
        .fails()
        .stderr_has("no recipes to run");
}
