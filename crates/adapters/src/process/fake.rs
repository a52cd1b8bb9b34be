// SPDX-License-Identifier: MIT

//! Fake process runner for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessCanceler, ProcessError, ProcessExit, ProcessHandle, ProcessRunner, ProcessSpec};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Scripted behavior for one fake spawn.
#[derive(Debug, Clone)]
pub struct ScriptedRun {
    stdout_chunks: Vec<Vec<u8>>,
    exit_code: Option<i32>,
    stderr: String,
    delay: Duration,
    hold_until_canceled: bool,
    fail_spawn: Option<String>,
    /// Raw bytes written to the `--report-plist=` path found in the
    /// spawn arguments, simulating the tool's report output.
    report_plist: Option<Vec<u8>>,
}

impl Default for ScriptedRun {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRun {
    /// A run that prints nothing and exits zero.
    pub fn new() -> Self {
        Self {
            stdout_chunks: Vec::new(),
            exit_code: Some(0),
            stderr: String::new(),
            delay: Duration::ZERO,
            hold_until_canceled: false,
            fail_spawn: None,
            report_plist: None,
        }
    }

    /// Append a stdout line (newline added) as one chunk.
    pub fn stdout_line(mut self, line: &str) -> Self {
        self.stdout_chunks.push(format!("{}\n", line).into_bytes());
        self
    }

    /// Append a raw stdout chunk, possibly a partial line.
    pub fn stdout_chunk(mut self, chunk: &[u8]) -> Self {
        self.stdout_chunks.push(chunk.to_vec());
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.stderr = text.to_string();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Keep the "process" alive until it is canceled.
    pub fn hold_until_canceled(mut self) -> Self {
        self.hold_until_canceled = true;
        self
    }

    /// Make the spawn itself fail (missing binary).
    pub fn fail_spawn(mut self, reason: &str) -> Self {
        self.fail_spawn = Some(reason.to_string());
        self
    }

    /// Write these bytes to the run's `--report-plist=` path.
    pub fn report_plist(mut self, bytes: Vec<u8>) -> Self {
        self.report_plist = Some(bytes);
        self
    }
}

/// Fake process runner for testing.
///
/// Pops one scripted run per spawn (falling back to an empty success)
/// and records every spawn spec.
#[derive(Clone, Default)]
pub struct FakeProcessRunner {
    inner: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<ScriptedRun>,
    calls: Vec<ProcessSpec>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the behavior for the next spawn.
    pub fn push_run(&self, run: ScriptedRun) {
        self.inner.lock().script.push_back(run);
    }

    /// Specs of every spawn so far, in order.
    pub fn calls(&self) -> Vec<ProcessSpec> {
        self.inner.lock().calls.clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.inner.lock().calls.len()
    }
}

fn report_path(spec: &ProcessSpec) -> Option<String> {
    spec.args
        .iter()
        .find_map(|a| a.strip_prefix("--report-plist="))
        .map(str::to_string)
}

#[async_trait]
impl ProcessRunner for FakeProcessRunner {
    async fn spawn(
        &self,
        spec: ProcessSpec,
        stdout_tx: mpsc::Sender<Vec<u8>>,
    ) -> Result<ProcessHandle, ProcessError> {
        let run = {
            let mut state = self.inner.lock();
            state.calls.push(spec.clone());
            state.script.pop_front().unwrap_or_default()
        };

        if let Some(reason) = run.fail_spawn {
            return Err(ProcessError::Spawn(reason));
        }

        if let Some(bytes) = &run.report_plist {
            if let Some(path) = report_path(&spec) {
                let _ = std::fs::write(path, bytes);
            }
        }

        let (canceler, mut cancel_rx) = ProcessCanceler::new();
        let (exit_tx, exit_rx) = oneshot::channel();

        tokio::spawn(async move {
            for chunk in run.stdout_chunks {
                if stdout_tx.send(chunk).await.is_err() {
                    break;
                }
            }
            drop(stdout_tx);

            let canceled = if run.hold_until_canceled {
                let _ = (&mut cancel_rx).await;
                true
            } else {
                if !run.delay.is_zero() {
                    tokio::time::sleep(run.delay).await;
                }
                cancel_rx.try_recv().is_ok()
            };

            let _ = exit_tx.send(ProcessExit {
                code: if canceled { None } else { run.exit_code },
                stderr: run.stderr,
                canceled,
            });
        });

        Ok(ProcessHandle::new(canceler, exit_rx))
    }
}
