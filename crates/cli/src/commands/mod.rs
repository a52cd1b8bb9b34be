// SPDX-License-Identifier: MIT

pub mod recipes;
pub mod repo;
pub mod run;
pub mod schedule;
pub mod search;
pub mod status;
pub mod version;

use crate::app::App;
use anyhow::{Context, Result};
use ph_adapters::LocalProcessRunner;
use ph_core::{TaskCompletion, TaskError};
use ph_engine::Task;
use std::sync::Arc;

/// Enqueue one task and wait for its completion.
pub(crate) async fn run_task(app: &App, task: Task<LocalProcessRunner>) -> Result<Arc<Task<LocalProcessRunner>>> {
    let task = Arc::new(task);
    let rx = app.queue.enqueue(Arc::clone(&task)).await?;
    let done: TaskCompletion = rx.await.context("task driver went away")?;
    match done.outcome {
        Ok(()) => Ok(task),
        Err(TaskError::Canceled) => {
            println!("canceled");
            Ok(task)
        }
        Err(e) => Err(e.into()),
    }
}
