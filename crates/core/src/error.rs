// SPDX-License-Identifier: MIT

//! Task error taxonomy

use thiserror::Error;

/// Every way a task can fail to deliver a normal result.
///
/// Runner and parser never panic across a completion boundary: each of
/// these is delivered as a value through the task's completion. `Canceled`
/// is carried here so asynchronous callers can distinguish an operator
/// stop from success, but the blocking launch path deliberately reports
/// it as success (an operator-initiated stop is not an error dialog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The task could not be constructed: empty search term, no recipes
    /// to run. No process was ever spawned.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool binary could not be spawned at all.
    #[error("failed to launch {program}: {reason}")]
    LaunchFailure { program: String, reason: String },

    /// The tool is missing or below the minimum supported version;
    /// the task was rejected before any process spawned.
    #[error("requirements not met: {0}")]
    RequirementsNotMet(String),

    /// The process ran and exited non-zero.
    #[error("autopkg exited with status {}: {stderr}", exit_display(.code))]
    ProcessFailure {
        code: Option<i32>,
        stderr: String,
    },

    /// The process exited zero but its report or output could not be
    /// interpreted. Distinct from `ProcessFailure` so callers can tell
    /// "ran but we can't read the results" from "didn't run".
    #[error("could not decode results: {0}")]
    ReportDecodeFailure(String),

    /// Cooperative stop requested by the operator.
    #[error("task canceled")]
    Canceled,
}

impl TaskError {
    /// True when this outcome is an operator cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

fn exit_display(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}
