// SPDX-License-Identifier: MIT

//! AutoPkg verbs and their invocation shapes

use serde::{Deserialize, Serialize};
use std::fmt;

/// The autopkg subcommand a task invokes.
///
/// Each verb maps to exactly one autopkg invocation shape; the fixed
/// arguments a verb always carries (e.g. `repo-update all`) live in the
/// task factories, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verb {
    /// `autopkg run --recipe-list=<path> --report-plist=<path>`
    RunRecipeList,
    /// `autopkg run <recipe...> --report-plist=<path>`
    RunRecipes,
    /// `autopkg repo-update all`
    RepoUpdate,
    /// `autopkg repo-add <url>`
    RepoAdd,
    /// `autopkg repo-remove <repo>`
    RepoRemove,
    /// `autopkg repo-list`
    RepoList,
    /// `autopkg search <term>`
    Search,
    /// `autopkg make-override <recipe>`
    MakeOverride,
    /// `autopkg list-recipes`
    ListRecipes,
    /// `autopkg version`
    Version,
}

impl Verb {
    /// The subcommand string passed as the first argument to autopkg.
    pub fn command(&self) -> &'static str {
        match self {
            Verb::RunRecipeList | Verb::RunRecipes => "run",
            Verb::RepoUpdate => "repo-update",
            Verb::RepoAdd => "repo-add",
            Verb::RepoRemove => "repo-remove",
            Verb::RepoList => "repo-list",
            Verb::Search => "search",
            Verb::MakeOverride => "make-override",
            Verb::ListRecipes => "list-recipes",
            Verb::Version => "version",
        }
    }

    /// Whether this verb writes a structured report plist on completion.
    pub fn produces_report(&self) -> bool {
        matches!(
            self,
            Verb::RunRecipeList | Verb::RunRecipes | Verb::RepoUpdate
        )
    }

    /// Whether this verb's stdout decodes into an ordered record sequence.
    pub fn enumerates(&self) -> bool {
        matches!(self, Verb::Search | Verb::RepoList | Verb::ListRecipes)
    }

    /// Whether the queue's admission policy gates this verb on the tool
    /// being installed and meeting the minimum version.
    ///
    /// Every verb runs against the tool's recipe/repo surface and must
    /// fail fast when the tool is missing or outdated, rather than
    /// surfacing a launch failure later. `version` is the one exemption
    /// so status probes can always run.
    pub fn gated_on_requirements(&self) -> bool {
        !matches!(self, Verb::Version)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::RunRecipeList => write!(f, "run-recipe-list"),
            Verb::RunRecipes => write!(f, "run-recipes"),
            _ => write!(f, "{}", self.command()),
        }
    }
}

#[cfg(test)]
#[path = "verb_tests.rs"]
mod tests;
