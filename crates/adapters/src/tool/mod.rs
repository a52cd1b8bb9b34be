// SPDX-License-Identifier: MIT

//! Tool install/version status adapters
//!
//! Execution gates on the external tool being present and new enough.
//! Tools are described by independent `ToolSpec` records selected from a
//! registry keyed by `ToolKind` — no inheritance, a tool is data plus
//! the probe that inspects it.

mod autopkg;

pub use autopkg::AutoPkgStatus;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeToolStatus;

use async_trait::async_trait;
use ph_core::ToolVersion;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why requirements are not met, in operator-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RequirementsFailure(pub String);

/// Tools the orchestrator knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    AutoPkg,
    Git,
}

/// Capability record for one tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub kind: ToolKind,
    pub binary: PathBuf,
    /// Minimum supported version; `None` means presence is enough.
    pub min_version: Option<ToolVersion>,
}

/// Registry of tool records, keyed by kind.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    specs: HashMap<ToolKind, ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Stock records for the tools this system orchestrates.
    pub fn defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(ToolSpec {
            kind: ToolKind::AutoPkg,
            binary: PathBuf::from("/usr/local/bin/autopkg"),
            min_version: ToolVersion::parse("0.4.2").ok(),
        });
        registry.insert(ToolSpec {
            kind: ToolKind::Git,
            binary: PathBuf::from("/usr/bin/git"),
            min_version: None,
        });
        registry
    }

    pub fn insert(&mut self, spec: ToolSpec) {
        self.specs.insert(spec.kind, spec);
    }

    pub fn get(&self, kind: ToolKind) -> Option<&ToolSpec> {
        self.specs.get(&kind)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Whether a binary exists at the spec's path.
pub(crate) fn binary_present(path: &Path) -> bool {
    path.is_file()
}

/// Adapter answering install/version questions about the external tool
#[async_trait]
pub trait ToolStatus: Clone + Send + Sync + 'static {
    /// Whether the tool binary is present.
    async fn installed(&self) -> bool;

    /// The tool's reported version, when it can be probed.
    async fn version(&self) -> Option<ToolVersion>;

    /// Whether the tool is present and meets the minimum version.
    /// The error carries the operator-facing explanation.
    async fn meets_requirements(&self) -> Result<(), RequirementsFailure>;
}
