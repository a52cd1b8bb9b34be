// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ph-adapters: process, tool-status, and progress-sink adapters

pub mod process;
pub mod sink;
pub mod subprocess;
pub mod tool;

pub use process::{
    LocalProcessRunner, ProcessCanceler, ProcessError, ProcessExit, ProcessHandle, ProcessRunner,
    ProcessSpec,
};
pub use sink::{NoopProgressSink, ProgressSink};
pub use tool::{AutoPkgStatus, RequirementsFailure, ToolKind, ToolRegistry, ToolSpec, ToolStatus};

#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessRunner, ScriptedRun};
#[cfg(any(test, feature = "test-support"))]
pub use sink::{FakeProgressSink, SinkCall};
#[cfg(any(test, feature = "test-support"))]
pub use tool::FakeToolStatus;
