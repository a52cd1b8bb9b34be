// SPDX-License-Identifier: MIT

//! Progress and completion events

use crate::error::TaskError;
use crate::id::TaskId;
use crate::verb::Verb;
use serde::{Deserialize, Serialize};

/// One progress update from a running task.
///
/// Emitted zero or more times per task, strictly before its completion,
/// in the order output lines were observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Human-readable status line.
    pub message: String,
    /// Completion fraction in `0.0..=1.0`, or `None` when indeterminate.
    pub fraction: Option<f64>,
}

impl Progress {
    /// A message-only update with no known completion fraction.
    pub fn indeterminate(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fraction: None,
        }
    }

    /// An update carrying a completion fraction, clamped to `0.0..=1.0`.
    pub fn at(message: impl Into<String>, fraction: f64) -> Self {
        Self {
            message: message.into(),
            fraction: Some(fraction.clamp(0.0, 1.0)),
        }
    }
}

/// Terminal status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Succeeded,
    Failed,
    Canceled,
}

/// Delivered exactly once per launched task, after all progress events.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletion {
    pub task_id: TaskId,
    pub verb: Verb,
    pub outcome: Result<(), TaskError>,
}

impl TaskCompletion {
    pub fn status(&self) -> TaskStatus {
        match &self.outcome {
            Ok(()) => TaskStatus::Succeeded,
            Err(TaskError::Canceled) => TaskStatus::Canceled,
            Err(_) => TaskStatus::Failed,
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.status() == TaskStatus::Canceled
    }

    /// The outcome as seen by blocking callers: cancellation is success.
    pub fn blocking_outcome(&self) -> Result<(), TaskError> {
        match &self.outcome {
            Err(e) if !e.is_canceled() => Err(e.clone()),
            _ => Ok(()),
        }
    }
}
