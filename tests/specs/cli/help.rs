//! CLI help output specs

use crate::prelude::*;

#[test]
fn ph_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn ph_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn ph_run_help_shows_flags() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--recipe-list")
        .stdout_has("--update-repos")
        .stdout_has("--force");
}

#[test]
fn ph_repo_help_shows_subcommands() {
    cli()
        .args(&["repo", "--help"])
        .passes()
        .stdout_has("add")
        .stdout_has("remove")
        .stdout_has("list")
        .stdout_has("update");
}

#[test]
fn ph_schedule_help_shows_subcommands() {
    cli()
        .args(&["schedule", "--help"])
        .passes()
        .stdout_has("show")
        .stdout_has("set")
        .stdout_has("off")
        .stdout_has("run");
}

#[test]
fn ph_version_flag_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
