// SPDX-License-Identifier: MIT

//! Structured run report model
//!
//! A run invocation writes its results to a `--report-plist` file. This
//! module is only the typed model; reading and writing the plist document
//! lives in the engine's report codec.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one recipe within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    Success,
    Failure,
    Skipped,
}

/// Per-recipe outcome record, in the order the tool processed recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeResult {
    /// Recipe identifier, e.g. `Firefox.munki`.
    pub recipe_identifier: String,
    pub status: RecipeStatus,
    /// Number of new downloads the recipe produced.
    #[serde(default)]
    pub downloads_count: u64,
    /// Path of a built package, when the recipe produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg_path: Option<PathBuf>,
    /// Non-fatal diagnostics raised while processing the recipe.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Failure diagnostic; expected only when `status` is `Failure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

impl RecipeResult {
    pub fn success(identifier: impl Into<String>) -> Self {
        Self {
            recipe_identifier: identifier.into(),
            status: RecipeStatus::Success,
            downloads_count: 0,
            pkg_path: None,
            warnings: Vec::new(),
            failure_message: None,
        }
    }

    pub fn failure(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipe_identifier: identifier.into(),
            status: RecipeStatus::Failure,
            downloads_count: 0,
            pkg_path: None,
            warnings: Vec::new(),
            failure_message: Some(message.into()),
        }
    }
}

/// The decoded report document.
///
/// Only meaningful when the process exited zero and the report file was
/// parseable; otherwise raw stderr/stdout is the only diagnostic. Fields
/// the tool emits beyond this schema are ignored on decode, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(default)]
    pub recipe_results: Vec<RecipeResult>,
}

impl RunReport {
    /// Records whose status is `Failure`, in report order.
    pub fn failures(&self) -> impl Iterator<Item = &RecipeResult> {
        self.recipe_results
            .iter()
            .filter(|r| r.status == RecipeStatus::Failure)
    }

    /// Total new downloads across all recipes.
    pub fn total_downloads(&self) -> u64 {
        self.recipe_results.iter().map(|r| r.downloads_count).sum()
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
