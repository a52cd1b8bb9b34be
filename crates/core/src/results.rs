// SPDX-License-Identifier: MIT

//! Records decoded from enumeration verbs
//!
//! `search`, `repo-list`, and `list-recipes` print their results to
//! stdout rather than a report file; these are the typed rows.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of `autopkg search` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Recipe file name, e.g. `Firefox.munki.recipe`.
    pub recipe: String,
    /// Repo the recipe lives in, e.g. `recipes`.
    pub repo: String,
    /// Path of the recipe within the repo.
    pub repo_path: String,
}

/// One row of `autopkg repo-list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Local checkout path of the repo.
    pub path: PathBuf,
    /// Remote URL the repo was added from.
    pub url: String,
}

/// One recipe name from `autopkg list-recipes` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeListing {
    pub name: String,
}

impl RecipeListing {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
