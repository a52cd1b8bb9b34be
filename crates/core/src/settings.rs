// SPDX-License-Identifier: MIT

//! Persistent orchestrator settings
//!
//! Loaded once at startup and saved whenever the schedule is mutated.
//! Everything else in the system receives these values by reference;
//! nothing reads the file behind the caller's back.

use crate::schedule::ScheduleConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where the external tool lives and what version it must meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Path to the autopkg binary.
    pub binary: PathBuf,
    /// Minimum autopkg version the orchestrator supports.
    pub min_version: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/usr/local/bin/autopkg"),
            min_version: "0.4.2".to_string(),
        }
    }
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tool: ToolSettings,
    /// Recipes the standard scheduled run processes, in order.
    pub recipes: Vec<String>,
    /// Optional recipe-list file; takes precedence over `recipes`.
    pub recipe_list: Option<PathBuf>,
    /// Update recipe repos before each scheduled run.
    pub update_repos_first: bool,
    pub schedule: ScheduleConfig,
}

impl Settings {
    /// Load settings, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        toml::from_str(&text).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write settings, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, text).map_err(|e| SettingsError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
