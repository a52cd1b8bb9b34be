// SPDX-License-Identifier: MIT

//! Serial task queue with admission control
//!
//! At most one task runs at a time; everything else waits in FIFO
//! order. Admission is checked at enqueue: verbs that mutate shared
//! tool state are rejected up front when the tool does not meet
//! requirements, so a misconfigured host fails fast instead of
//! queueing doomed work.

use crate::task::Task;
use parking_lot::Mutex;
use ph_adapters::{ProcessRunner, ProgressSink, ToolStatus};
use ph_core::{TaskCompletion, TaskError, TaskId};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

/// FIFO queue running tasks one at a time.
///
/// Cloning shares the queue. Completions are delivered through the
/// receiver returned by [`TaskQueue::enqueue`]; progress and failure
/// notices flow to the queue's sink.
pub struct TaskQueue<P: ProcessRunner, T: ToolStatus, S: ProgressSink> {
    tool: T,
    sink: S,
    state: Arc<Mutex<QueueState<P>>>,
}

impl<P: ProcessRunner, T: ToolStatus, S: ProgressSink> Clone for TaskQueue<P, T, S> {
    fn clone(&self) -> Self {
        Self {
            tool: self.tool.clone(),
            sink: self.sink.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

struct QueueState<P: ProcessRunner> {
    active: Option<Arc<Task<P>>>,
    pending: VecDeque<QueuedTask<P>>,
}

struct QueuedTask<P: ProcessRunner> {
    task: Arc<Task<P>>,
    done_tx: oneshot::Sender<TaskCompletion>,
}

impl<P, T, S> TaskQueue<P, T, S>
where
    P: ProcessRunner,
    T: ToolStatus,
    S: ProgressSink,
{
    pub fn new(tool: T, sink: S) -> Self {
        Self {
            tool,
            sink,
            state: Arc::new(Mutex::new(QueueState {
                active: None,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Admit a task and start it when its turn comes.
    ///
    /// The caller keeps its `Arc` for post-completion accessors. The
    /// returned receiver resolves with the task's completion; dropping
    /// it does not cancel the task. Gated verbs are rejected here,
    /// before queueing, when requirements are not met.
    pub async fn enqueue(
        &self,
        task: Arc<Task<P>>,
    ) -> Result<oneshot::Receiver<TaskCompletion>, TaskError> {
        if task.verb().gated_on_requirements() {
            self.tool
                .meets_requirements()
                .await
                .map_err(|e| TaskError::RequirementsNotMet(e.to_string()))?;
        }

        let (done_tx, done_rx) = oneshot::channel();
        let start_now = {
            let mut state = self.state.lock();
            if state.active.is_some() {
                tracing::debug!(task = %task.id(), verb = %task.verb(), queued = state.pending.len() + 1, "task queued");
                state.pending.push_back(QueuedTask {
                    task: Arc::clone(&task),
                    done_tx,
                });
                None
            } else {
                state.active = Some(Arc::clone(&task));
                Some(done_tx)
            }
        };
        if let Some(done_tx) = start_now {
            self.spawn_run(task, done_tx);
        }
        Ok(done_rx)
    }

    /// Cancel the running task, if any. Queued tasks keep their place.
    pub fn cancel_current(&self) {
        let active = self.state.lock().active.clone();
        if let Some(task) = active {
            task.cancel();
        }
    }

    /// Cancel one task by id, running or queued.
    ///
    /// A queued task keeps its place and resolves `Canceled` when its
    /// turn comes, without ever spawning a process.
    pub fn cancel_task(&self, id: TaskId) {
        let target = {
            let state = self.state.lock();
            state
                .active
                .iter()
                .chain(state.pending.iter().map(|e| &e.task))
                .find(|t| t.id() == id)
                .cloned()
        };
        if let Some(task) = target {
            task.cancel();
        }
    }

    /// Cancel everything: the running task cooperatively, and every
    /// queued task immediately. Queued tasks resolve with a `Canceled`
    /// completion and never spawn; no progress is emitted for them.
    pub fn cancel_all(&self) {
        let (active, drained) = {
            let mut state = self.state.lock();
            (state.active.clone(), state.pending.drain(..).collect::<Vec<_>>())
        };
        for entry in drained {
            entry.task.cancel();
            let completion = TaskCompletion {
                task_id: entry.task.id(),
                verb: entry.task.verb(),
                outcome: Err(TaskError::Canceled),
            };
            let _ = entry.done_tx.send(completion);
        }
        if let Some(task) = active {
            task.cancel();
        }
    }

    /// Whether a task is currently running.
    pub fn is_busy(&self) -> bool {
        self.state.lock().active.is_some()
    }

    /// Number of tasks waiting behind the active one.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    fn spawn_run(&self, task: Arc<Task<P>>, done_tx: oneshot::Sender<TaskCompletion>) {
        let queue = self.clone();
        tokio::spawn(async move {
            let completion = task.launch(&queue.sink).await;
            if let Err(e) = &completion.outcome {
                if !e.is_canceled() {
                    queue
                        .sink
                        .notice(&format!("{} failed", completion.verb), &e.to_string())
                        .await;
                }
            }
            let _ = done_tx.send(completion);
            queue.start_next();
        });
    }

    fn start_next(&self) {
        let next = {
            let mut state = self.state.lock();
            match state.pending.pop_front() {
                Some(entry) => {
                    state.active = Some(Arc::clone(&entry.task));
                    Some(entry)
                }
                None => {
                    state.active = None;
                    None
                }
            }
        };
        if let Some(entry) = next {
            self.spawn_run(entry.task, entry.done_tx);
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
