// SPDX-License-Identifier: MIT

//! AutoPkg install/version probe

use super::{binary_present, RequirementsFailure, ToolKind, ToolRegistry, ToolStatus};
use crate::subprocess::{run_with_timeout, VERSION_PROBE_TIMEOUT};
use async_trait::async_trait;
use ph_core::{ToolSettings, ToolVersion};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;

/// Probes the local autopkg (and its git prerequisite) via the registry.
#[derive(Clone)]
pub struct AutoPkgStatus {
    registry: Arc<ToolRegistry>,
}

impl AutoPkgStatus {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build a registry from settings, keeping the stock git record.
    pub fn from_settings(tool: &ToolSettings) -> Self {
        let mut registry = ToolRegistry::defaults();
        registry.insert(super::ToolSpec {
            kind: ToolKind::AutoPkg,
            binary: tool.binary.clone(),
            min_version: ToolVersion::parse(&tool.min_version).ok(),
        });
        Self::new(registry)
    }

    fn autopkg_binary(&self) -> Option<PathBuf> {
        self.registry
            .get(ToolKind::AutoPkg)
            .map(|s| s.binary.clone())
    }

    fn min_version(&self) -> Option<ToolVersion> {
        self.registry
            .get(ToolKind::AutoPkg)
            .and_then(|s| s.min_version.clone())
    }
}

#[async_trait]
impl ToolStatus for AutoPkgStatus {
    async fn installed(&self) -> bool {
        self.autopkg_binary()
            .map(|p| binary_present(&p))
            .unwrap_or(false)
    }

    async fn version(&self) -> Option<ToolVersion> {
        let binary = self.autopkg_binary()?;
        let mut cmd = Command::new(&binary);
        cmd.arg("version");

        let output = match run_with_timeout(cmd, VERSION_PROBE_TIMEOUT, "autopkg version").await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "version probe failed");
                return None;
            }
        };
        if !output.status.success() {
            return None;
        }
        ToolVersion::parse(&String::from_utf8_lossy(&output.stdout)).ok()
    }

    async fn meets_requirements(&self) -> Result<(), RequirementsFailure> {
        let Some(binary) = self.autopkg_binary() else {
            return Err(RequirementsFailure(
                "no autopkg record registered".to_string(),
            ));
        };
        if !binary_present(&binary) {
            return Err(RequirementsFailure(format!(
                "autopkg is not installed at {}",
                binary.display()
            )));
        }

        if let Some(min) = self.min_version() {
            match self.version().await {
                Some(found) if found < min => {
                    return Err(RequirementsFailure(format!(
                        "autopkg {} is older than the required {}",
                        found, min
                    )));
                }
                Some(_) => {}
                None => {
                    return Err(RequirementsFailure(
                        "autopkg version could not be determined".to_string(),
                    ));
                }
            }
        }

        if let Some(git) = self.registry.get(ToolKind::Git) {
            if !binary_present(&git.binary) {
                return Err(RequirementsFailure(format!(
                    "git is not installed at {}",
                    git.binary.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "autopkg_tests.rs"]
mod tests;
