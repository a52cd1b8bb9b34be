// SPDX-License-Identifier: MIT

use super::*;
use crate::task::TaskFactory;
use ph_adapters::{FakeProcessRunner, FakeProgressSink, FakeToolStatus, ScriptedRun};
use ph_core::TaskStatus;

type TestQueue = TaskQueue<FakeProcessRunner, FakeToolStatus, FakeProgressSink>;

struct Harness {
    runner: FakeProcessRunner,
    factory: TaskFactory<FakeProcessRunner>,
    sink: FakeProgressSink,
    queue: TestQueue,
}

fn harness(tool: FakeToolStatus) -> Harness {
    let runner = FakeProcessRunner::new();
    let factory = TaskFactory::new(runner.clone(), "/usr/local/bin/autopkg");
    let sink = FakeProgressSink::new();
    let queue = TaskQueue::new(tool, sink.clone());
    Harness {
        runner,
        factory,
        sink,
        queue,
    }
}

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn tasks_run_one_at_a_time_in_submission_order() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner.push_run(ScriptedRun::new().hold_until_canceled());
    h.runner.push_run(ScriptedRun::new());

    let rx1 = h
        .queue
        .enqueue(Arc::new(h.factory.search("firefox").unwrap()))
        .await
        .unwrap();
    let rx2 = h
        .queue
        .enqueue(Arc::new(h.factory.search("chrome").unwrap()))
        .await
        .unwrap();
    settle().await;

    // Only the first task has spawned; the second waits its turn.
    assert_eq!(h.runner.spawn_count(), 1);
    assert!(h.queue.is_busy());
    assert_eq!(h.queue.pending_len(), 1);

    h.queue.cancel_current();
    assert!(rx1.await.unwrap().is_canceled());

    let done2 = rx2.await.unwrap();
    assert_eq!(done2.status(), TaskStatus::Succeeded);
    assert_eq!(h.runner.spawn_count(), 2);
    assert_eq!(h.runner.calls()[0].args, vec!["search", "firefox"]);
    assert_eq!(h.runner.calls()[1].args, vec!["search", "chrome"]);
}

#[tokio::test]
async fn queue_drains_to_idle() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner.push_run(ScriptedRun::new());

    let rx = h
        .queue
        .enqueue(Arc::new(h.factory.list_recipes().unwrap()))
        .await
        .unwrap();
    rx.await.unwrap();
    settle().await;

    assert!(!h.queue.is_busy());
    assert_eq!(h.queue.pending_len(), 0);
}

#[tokio::test]
async fn gated_verbs_are_rejected_when_requirements_fail() {
    let h = harness(FakeToolStatus::not_installed());

    let err = h
        .queue
        .enqueue(Arc::new(h.factory.repo_update().unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::RequirementsNotMet(_)));
    assert!(err.to_string().contains("not installed"));

    // Nothing was queued and nothing spawned.
    assert!(!h.queue.is_busy());
    assert_eq!(h.queue.pending_len(), 0);
    assert_eq!(h.runner.spawn_count(), 0);
}

#[tokio::test]
async fn enumeration_verbs_are_gated_like_repo_verbs() {
    let h = harness(FakeToolStatus::not_installed());

    let tasks = [
        h.factory.repo_list().unwrap(),
        h.factory.search("firefox").unwrap(),
        h.factory.list_recipes().unwrap(),
    ];
    for task in tasks {
        let err = h.queue.enqueue(Arc::new(task)).await.unwrap_err();
        assert!(matches!(err, TaskError::RequirementsNotMet(_)));
    }
    assert_eq!(h.runner.spawn_count(), 0);
    assert_eq!(h.queue.pending_len(), 0);
}

#[tokio::test]
async fn version_probe_is_admitted_without_the_tool() {
    let h = harness(FakeToolStatus::not_installed());
    h.runner.push_run(ScriptedRun::new().stdout_line("2.7.2"));

    let rx = h
        .queue
        .enqueue(Arc::new(h.factory.version().unwrap()))
        .await
        .unwrap();
    assert_eq!(rx.await.unwrap().status(), TaskStatus::Succeeded);
}

#[tokio::test]
async fn cancel_all_resolves_queued_tasks_without_spawning() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner.push_run(ScriptedRun::new().hold_until_canceled());

    let rx_active = h
        .queue
        .enqueue(Arc::new(h.factory.search("one").unwrap()))
        .await
        .unwrap();
    let rx_q1 = h
        .queue
        .enqueue(Arc::new(h.factory.search("two").unwrap()))
        .await
        .unwrap();
    let rx_q2 = h
        .queue
        .enqueue(Arc::new(h.factory.search("three").unwrap()))
        .await
        .unwrap();
    settle().await;

    h.queue.cancel_all();

    assert!(rx_active.await.unwrap().is_canceled());
    assert!(rx_q1.await.unwrap().is_canceled());
    assert!(rx_q2.await.unwrap().is_canceled());

    settle().await;
    assert!(!h.queue.is_busy());
    // Only the active task ever reached a process.
    assert_eq!(h.runner.spawn_count(), 1);
    // Queued tasks emit no progress on cancellation.
    assert!(h.sink.messages().is_empty());
}

#[tokio::test]
async fn queued_task_canceled_by_id_never_spawns_and_keeps_order() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner.push_run(ScriptedRun::new().hold_until_canceled());
    h.runner.push_run(ScriptedRun::new());

    let rx1 = h
        .queue
        .enqueue(Arc::new(h.factory.search("one").unwrap()))
        .await
        .unwrap();
    let doomed = Arc::new(h.factory.search("two").unwrap());
    let doomed_id = doomed.id();
    let rx2 = h.queue.enqueue(doomed).await.unwrap();
    let rx3 = h
        .queue
        .enqueue(Arc::new(h.factory.search("three").unwrap()))
        .await
        .unwrap();
    settle().await;

    h.queue.cancel_task(doomed_id);
    h.queue.cancel_current();

    assert!(rx1.await.unwrap().is_canceled());
    assert!(rx2.await.unwrap().is_canceled());
    assert_eq!(rx3.await.unwrap().status(), TaskStatus::Succeeded);

    // "two" never spawned; "three" still ran in its turn.
    assert_eq!(h.runner.spawn_count(), 2);
    assert_eq!(h.runner.calls()[1].args, vec!["search", "three"]);
}

#[tokio::test]
async fn progress_flows_through_the_queue_sink_in_order() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner.push_run(
        ScriptedRun::new()
            .stdout_line("first line")
            .stdout_line("second line"),
    );

    let rx = h
        .queue
        .enqueue(Arc::new(h.factory.list_recipes().unwrap()))
        .await
        .unwrap();
    rx.await.unwrap();

    assert_eq!(h.sink.messages(), vec!["first line", "second line"]);
}

#[tokio::test]
async fn failures_are_surfaced_as_notices() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner
        .push_run(ScriptedRun::new().exit_code(1).stderr("bad recipe"));

    let rx = h
        .queue
        .enqueue(Arc::new(h.factory.search("firefox").unwrap()))
        .await
        .unwrap();
    let done = rx.await.unwrap();

    assert_eq!(done.status(), TaskStatus::Failed);
    assert_eq!(h.sink.notices(), vec!["search failed"]);
}

#[tokio::test]
async fn dropping_the_receiver_does_not_cancel_the_task() {
    let h = harness(FakeToolStatus::installed("2.7.2"));
    h.runner.push_run(ScriptedRun::new());

    let rx = h
        .queue
        .enqueue(Arc::new(h.factory.list_recipes().unwrap()))
        .await
        .unwrap();
    drop(rx);
    settle().await;

    assert_eq!(h.runner.spawn_count(), 1);
    assert!(!h.queue.is_busy());
}
