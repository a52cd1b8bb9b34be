// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ph-core: Core types for the Packhorse orchestrator

pub mod clock;
pub mod error;
pub mod id;
pub mod progress;
pub mod report;
pub mod results;
pub mod schedule;
pub mod settings;
pub mod verb;
pub mod version;

pub use clock::{Clock, SystemClock};
pub use error::TaskError;
pub use id::TaskId;
pub use progress::{Progress, TaskCompletion, TaskStatus};
pub use report::{RecipeResult, RecipeStatus, RunReport};
pub use results::{RecipeListing, RepoEntry, SearchHit};
pub use schedule::{ScheduleConfig, ScheduleError, ScheduleMode};
pub use settings::{Settings, SettingsError, ToolSettings};
pub use verb::Verb;
pub use version::{ToolVersion, VersionParseError};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
