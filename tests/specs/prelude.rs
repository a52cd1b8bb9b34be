//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    // Check for llvm-cov target directory first
    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    // Standard target directory (works when CARGO_MANIFEST_DIR is correct)
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself.
    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where ph is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the ph binary.
fn ph_binary() -> PathBuf {
    binary_path("ph")
}

/// Create a CLI builder for ph commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// A settings file in its own temp directory.
pub struct TestConfig {
    dir: tempfile::TempDir,
}

impl TestConfig {
    /// Write a settings file with the given contents.
    pub fn with(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), contents).expect("write config");
        Self { dir }
    }

    /// A settings file pointing at an autopkg binary that does not exist.
    pub fn missing_tool() -> Self {
        Self::with("[tool]\nbinary = \"/nonexistent/autopkg\"\nmin_version = \"0.4.2\"\n")
    }

    /// An empty temp directory with no settings file written yet.
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(self.path()).expect("read config")
    }

    /// A builder preconfigured with `--config` for this file.
    pub fn cli(&self) -> CliBuilder {
        cli().args(&["--config", &self.path().to_string_lossy()])
    }
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(ph_binary());
        cmd.args(&self.args);
        // Keep log output away from the assertions.
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout contains the given text
    pub fn stdout_has(self, text: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(text),
            "expected stdout to contain {:?}\nstdout: {}",
            text,
            stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn stderr_has(self, text: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(text),
            "expected stderr to contain {:?}\nstderr: {}",
            text,
            stderr
        );
        self
    }
}
