// SPDX-License-Identifier: MIT

//! Local process runner over tokio child processes

use super::{ProcessCanceler, ProcessError, ProcessExit, ProcessHandle, ProcessRunner, ProcessSpec};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

/// Grace period between SIGTERM and SIGKILL on cancellation.
const TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// Spawns real child processes on the local machine.
#[derive(Debug, Clone)]
pub struct LocalProcessRunner {
    grace: Duration,
}

impl Default for LocalProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self {
            grace: TERMINATE_GRACE,
        }
    }

    /// Override the SIGTERM-to-SIGKILL grace period (tests use a short one).
    pub fn with_grace(grace: Duration) -> Self {
        Self { grace }
    }
}

#[async_trait]
impl ProcessRunner for LocalProcessRunner {
    async fn spawn(
        &self,
        spec: ProcessSpec,
        stdout_tx: mpsc::Sender<Vec<u8>>,
    ) -> Result<ProcessHandle, ProcessError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| ProcessError::Spawn(format!("{}: {}", spec.program.display(), e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::Spawn("stdout pipe unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ProcessError::Spawn("stderr pipe unavailable".to_string()))?;

        let (canceler, cancel_rx) = ProcessCanceler::new();
        let (exit_tx, exit_rx) = oneshot::channel();
        let grace = self.grace;

        tokio::spawn(async move {
            let out_task = tokio::spawn(forward_chunks(stdout, stdout_tx));
            let err_task = tokio::spawn(collect_text(stderr));

            let (code, canceled) = wait_or_cancel(child, cancel_rx, grace).await;

            // Drain readers before reporting exit so every stdout chunk
            // is delivered ahead of completion.
            let _ = out_task.await;
            let stderr_text = err_task.await.unwrap_or_default();

            let _ = exit_tx.send(ProcessExit {
                code,
                stderr: stderr_text,
                canceled,
            });
        });

        Ok(ProcessHandle::new(canceler, exit_rx))
    }
}

async fn forward_chunks<R: AsyncRead + Unpin>(mut reader: R, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn collect_text<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut out = String::new();
    let _ = reader.read_to_string(&mut out).await;
    out
}

/// Wait for exit, or terminate on cancel: SIGTERM, grace, then SIGKILL.
async fn wait_or_cancel(
    mut child: Child,
    cancel_rx: oneshot::Receiver<()>,
    grace: Duration,
) -> (Option<i32>, bool) {
    tokio::select! {
        status = child.wait() => {
            (status.ok().and_then(|s| s.code()), false)
        }
        _ = cancel_rx => {
            terminate(&child);
            let status = match tokio::time::timeout(grace, child.wait()).await {
                Ok(status) => status,
                Err(_elapsed) => {
                    tracing::warn!("process ignored SIGTERM, killing");
                    let _ = child.start_kill();
                    child.wait().await
                }
            };
            (status.ok().and_then(|s| s.code()), true)
        }
    }
}

#[cfg(unix)]
fn terminate(child: &Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }
}

#[cfg(not(unix))]
fn terminate(_child: &Child) {}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
