// SPDX-License-Identifier: MIT

use super::*;
use crate::tool::ToolSpec;
use std::path::Path;

fn registry_with(autopkg: &Path, git: &Path, min_version: &str) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.insert(ToolSpec {
        kind: ToolKind::AutoPkg,
        binary: autopkg.to_path_buf(),
        min_version: ToolVersion::parse(min_version).ok(),
    });
    registry.insert(ToolSpec {
        kind: ToolKind::Git,
        binary: git.to_path_buf(),
        min_version: None,
    });
    registry
}

#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, version: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\necho {}\n", version)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn missing_binary_is_not_installed() {
    let dir = tempfile::tempdir().unwrap();
    let status = AutoPkgStatus::new(registry_with(
        &dir.path().join("absent"),
        &dir.path().join("absent-git"),
        "0.4.2",
    ));

    assert!(!status.installed().await);
    let err = status.meets_requirements().await.unwrap_err();
    assert!(err.0.contains("not installed"), "got: {}", err);
}

#[cfg(unix)]
#[tokio::test]
async fn probe_reads_version_from_tool_output() {
    let dir = tempfile::tempdir().unwrap();
    let autopkg = fake_tool(dir.path(), "autopkg", "2.7.2");
    let git = fake_tool(dir.path(), "git", "2.39.0");

    let status = AutoPkgStatus::new(registry_with(&autopkg, &git, "0.4.2"));
    assert!(status.installed().await);
    assert_eq!(status.version().await, ToolVersion::parse("2.7.2").ok());
    assert!(status.meets_requirements().await.is_ok());
}

#[cfg(unix)]
#[tokio::test]
async fn old_version_fails_requirements() {
    let dir = tempfile::tempdir().unwrap();
    let autopkg = fake_tool(dir.path(), "autopkg", "0.3.9");
    let git = fake_tool(dir.path(), "git", "2.39.0");

    let status = AutoPkgStatus::new(registry_with(&autopkg, &git, "0.4.2"));
    let err = status.meets_requirements().await.unwrap_err();
    assert!(err.0.contains("older"), "got: {}", err);
}

#[cfg(unix)]
#[tokio::test]
async fn missing_git_fails_requirements() {
    let dir = tempfile::tempdir().unwrap();
    let autopkg = fake_tool(dir.path(), "autopkg", "2.7.2");

    let status = AutoPkgStatus::new(registry_with(
        &autopkg,
        &dir.path().join("absent-git"),
        "0.4.2",
    ));
    let err = status.meets_requirements().await.unwrap_err();
    assert!(err.0.contains("git"), "got: {}", err);
}

#[test]
fn from_settings_overrides_autopkg_record() {
    let settings = ToolSettings {
        binary: "/opt/autopkg/bin/autopkg".into(),
        min_version: "1.0".to_string(),
    };
    let status = AutoPkgStatus::from_settings(&settings);
    assert_eq!(
        status.autopkg_binary(),
        Some(std::path::PathBuf::from("/opt/autopkg/bin/autopkg"))
    );
    assert_eq!(status.min_version(), ToolVersion::parse("1.0").ok());
}
