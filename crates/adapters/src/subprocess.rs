// SPDX-License-Identifier: MIT

//! Subprocess execution helpers

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Default timeout for tool version probes.
pub const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A short-lived probe command failed before producing output.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{description} failed: {source}")]
    Io {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {timeout_secs}s")]
    TimedOut {
        description: String,
        timeout_secs: u64,
    },
}

/// Run a short-lived command, killing it if the timeout elapses.
///
/// The child is killed on drop, so a timed-out probe does not linger.
/// A non-zero exit is not an error here; callers inspect the status.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, ProbeError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|source| ProbeError::Io {
            description: description.to_string(),
            source,
        }),
        Err(_) => Err(ProbeError::TimedOut {
            description: description.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
