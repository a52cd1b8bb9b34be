// SPDX-License-Identifier: MIT

use super::*;
use tokio::sync::mpsc;

async fn collect_chunks(mut rx: mpsc::Receiver<Vec<u8>>) -> String {
    let mut out = Vec::new();
    while let Some(chunk) = rx.recv().await {
        out.extend(chunk);
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn sh(script: &str) -> ProcessSpec {
    ProcessSpec::new("/bin/sh").arg("-c").arg(script)
}

#[tokio::test]
async fn streams_stdout_and_reports_exit() {
    let runner = LocalProcessRunner::new();
    let (tx, rx) = mpsc::channel(16);

    let handle = runner
        .spawn(sh("printf 'one\\ntwo\\n'"), tx)
        .await
        .unwrap();
    let exit = handle.wait().await;

    assert_eq!(exit.code, Some(0));
    assert!(exit.success());
    assert!(!exit.canceled);
    assert_eq!(collect_chunks(rx).await, "one\ntwo\n");
}

#[tokio::test]
async fn nonzero_exit_with_buffered_stderr() {
    let runner = LocalProcessRunner::new();
    let (tx, _rx) = mpsc::channel(16);

    let handle = runner
        .spawn(sh("echo oops >&2; exit 3"), tx)
        .await
        .unwrap();
    let exit = handle.wait().await;

    assert_eq!(exit.code, Some(3));
    assert!(!exit.success());
    assert!(exit.stderr.contains("oops"), "stderr: {}", exit.stderr);
}

#[tokio::test]
async fn missing_binary_fails_to_spawn() {
    let runner = LocalProcessRunner::new();
    let (tx, mut rx) = mpsc::channel(16);

    let result = runner
        .spawn(ProcessSpec::new("/nonexistent/autopkg").arg("version"), tx)
        .await;

    assert!(matches!(result, Err(ProcessError::Spawn(_))));
    // No line events for a process that never started.
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn cancel_terminates_and_marks_exit_canceled() {
    let runner = LocalProcessRunner::with_grace(Duration::from_millis(500));
    let (tx, _rx) = mpsc::channel(16);

    let handle = runner.spawn(sh("sleep 30"), tx).await.unwrap();
    let canceler = handle.canceler();
    canceler.cancel();

    let exit = tokio::time::timeout(Duration::from_secs(10), handle.wait())
        .await
        .unwrap();
    assert!(exit.canceled);
    assert!(!exit.success());
}

#[tokio::test]
async fn cancel_twice_is_harmless() {
    let runner = LocalProcessRunner::with_grace(Duration::from_millis(500));
    let (tx, _rx) = mpsc::channel(16);

    let handle = runner.spawn(sh("sleep 30"), tx).await.unwrap();
    let canceler = handle.canceler();
    canceler.cancel();
    canceler.cancel();

    let exit = tokio::time::timeout(Duration::from_secs(10), handle.wait())
        .await
        .unwrap();
    assert!(exit.canceled);
}

#[tokio::test]
async fn env_is_passed_through() {
    let runner = LocalProcessRunner::new();
    let (tx, rx) = mpsc::channel(16);

    let mut spec = sh("printf '%s' \"$PH_TEST_VALUE\"");
    spec.env.push(("PH_TEST_VALUE".to_string(), "forty-two".to_string()));

    let handle = runner.spawn(spec, tx).await.unwrap();
    let exit = handle.wait().await;

    assert_eq!(exit.code, Some(0));
    assert_eq!(collect_chunks(rx).await, "forty-two");
}
