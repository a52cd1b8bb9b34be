// SPDX-License-Identifier: MIT

//! Process execution adapters
//!
//! The `ProcessRunner` trait encapsulates spawning one external-tool
//! invocation: stdout is streamed to the caller as raw byte chunks
//! (line splitting is the output parser's job), stderr is buffered and
//! surfaced with the exit, and cancellation is cooperative — SIGTERM
//! first, SIGKILL only after a grace period. Every spawned process
//! resolves its handle exactly once, cancellation included.

mod local;

pub use local::LocalProcessRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessRunner, ScriptedRun};

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Errors from process operations
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The binary could not be spawned (missing, not executable).
    #[error("spawn failed: {0}")]
    Spawn(String),
}

/// One invocation of the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Final state of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code; `None` when the process died to a signal.
    pub code: Option<i32>,
    /// Buffered stderr text.
    pub stderr: String,
    /// Whether cancellation was requested before exit was observed.
    pub canceled: bool,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0) && !self.canceled
    }
}

/// Cloneable cancellation control for a spawned process.
///
/// The first `cancel()` wins; later calls are no-ops.
#[derive(Clone)]
pub struct ProcessCanceler {
    tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl ProcessCanceler {
    pub(crate) fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    pub fn cancel(&self) {
        if let Some(tx) = self.tx.lock().take() {
            let _ = tx.send(());
        }
    }
}

/// Handle to a spawned process.
pub struct ProcessHandle {
    canceler: ProcessCanceler,
    exit_rx: oneshot::Receiver<ProcessExit>,
}

impl ProcessHandle {
    pub(crate) fn new(canceler: ProcessCanceler, exit_rx: oneshot::Receiver<ProcessExit>) -> Self {
        Self { canceler, exit_rx }
    }

    /// A clone of the cancellation control, usable from another task.
    pub fn canceler(&self) -> ProcessCanceler {
        self.canceler.clone()
    }

    /// Wait for the process to finish.
    pub async fn wait(self) -> ProcessExit {
        self.exit_rx.await.unwrap_or(ProcessExit {
            code: None,
            stderr: "process driver dropped before exit".to_string(),
            canceled: false,
        })
    }
}

/// Adapter for spawning external-tool processes
#[async_trait]
pub trait ProcessRunner: Clone + Send + Sync + 'static {
    /// Spawn a process, streaming stdout chunks to `stdout_tx` as they
    /// arrive. Returns immediately; completion is observed through the
    /// returned handle. All chunks are delivered before the handle's
    /// `wait` resolves.
    async fn spawn(
        &self,
        spec: ProcessSpec,
        stdout_tx: mpsc::Sender<Vec<u8>>,
    ) -> Result<ProcessHandle, ProcessError>;
}
