// SPDX-License-Identifier: MIT

//! Task engine: output parsing, task lifecycle, queueing and scheduling
//!
//! A [`Task`] binds one `autopkg` invocation: the verb, its arguments,
//! and the interpretation of its output. The [`TaskQueue`] runs tasks
//! one at a time in submission order, and the [`RunScheduler`] feeds
//! recurring recipe runs into the queue.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod parser;
pub mod queue;
pub mod report;
pub mod scheduler;
pub mod task;

pub use parser::{decode_recipe_list, decode_repo_list, decode_search, DecodeError, OutputParser};
pub use queue::TaskQueue;
pub use report::{read_report, report_bytes, write_report};
pub use scheduler::{RunPlan, RunScheduler};
pub use task::{Task, TaskFactory};
