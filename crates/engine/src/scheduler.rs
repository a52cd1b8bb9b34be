// SPDX-License-Identifier: MIT

//! Recurring run scheduling
//!
//! One timer loop per configuration generation: every reconfigure bumps
//! the generation and arms a fresh loop, and any older loop retires at
//! its next wakeup. There is never a moment with two live timers for
//! one scheduler. Fires go through the shared [`TaskQueue`], so a
//! scheduled run waits behind whatever an operator started by hand.

use crate::queue::TaskQueue;
use crate::task::TaskFactory;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use ph_adapters::{ProcessRunner, ProgressSink, ToolStatus};
use ph_core::{Clock, ScheduleConfig, ScheduleError};
use std::path::PathBuf;
use std::sync::Arc;

/// What a scheduled fire actually runs.
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    /// Recipes to run when no recipe list is set.
    pub recipes: Vec<String>,
    /// Recipe list file; takes precedence over `recipes`.
    pub recipe_list: Option<PathBuf>,
    /// Update recipe repos before each scheduled run.
    pub update_repos_first: bool,
}

struct SchedulerState {
    config: ScheduleConfig,
    plan: RunPlan,
    /// Bumped on every reconfigure; a timer loop whose generation no
    /// longer matches is stale and exits.
    generation: u64,
    next_fire: Option<NaiveDateTime>,
}

/// Drives recurring recipe runs into a [`TaskQueue`].
pub struct RunScheduler<P: ProcessRunner, T: ToolStatus, S: ProgressSink, C: Clock> {
    queue: TaskQueue<P, T, S>,
    factory: TaskFactory<P>,
    sink: S,
    clock: C,
    state: Arc<Mutex<SchedulerState>>,
}

impl<P: ProcessRunner, T: ToolStatus, S: ProgressSink, C: Clock> Clone
    for RunScheduler<P, T, S, C>
{
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            factory: self.factory.clone(),
            sink: self.sink.clone(),
            clock: self.clock.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<P, T, S, C> RunScheduler<P, T, S, C>
where
    P: ProcessRunner,
    T: ToolStatus,
    S: ProgressSink,
    C: Clock,
{
    /// A scheduler that starts disarmed.
    pub fn new(
        queue: TaskQueue<P, T, S>,
        factory: TaskFactory<P>,
        sink: S,
        clock: C,
        plan: RunPlan,
    ) -> Self {
        Self {
            queue,
            factory,
            sink,
            clock,
            state: Arc::new(Mutex::new(SchedulerState {
                config: ScheduleConfig::default(),
                plan,
                generation: 0,
                next_fire: None,
            })),
        }
    }

    /// Replace the schedule, atomically retiring any armed timer.
    ///
    /// A disarmed configuration (disabled, or a zero interval) stops
    /// the scheduler; an armed one starts a fresh timer loop.
    pub fn configure(&self, config: ScheduleConfig) -> Result<(), ScheduleError> {
        config.validate()?;
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.config = config;
            state.next_fire = config.next_fire_after(self.clock.wall());
            state.generation
        };
        if config.is_armed() {
            tracing::info!(generation, "schedule armed");
            self.arm(generation);
        } else {
            tracing::info!("schedule disarmed");
        }
        Ok(())
    }

    /// Disarm without touching the stored mode.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.config.enabled = false;
        state.next_fire = None;
        tracing::info!("schedule stopped");
    }

    /// Replace what fires run; takes effect from the next fire.
    pub fn set_plan(&self, plan: RunPlan) {
        self.state.lock().plan = plan;
    }

    pub fn config(&self) -> ScheduleConfig {
        self.state.lock().config
    }

    /// Wall-clock time of the next fire, when armed.
    pub fn next_fire(&self) -> Option<NaiveDateTime> {
        self.state.lock().next_fire
    }

    /// Run the plan immediately, through the same queue as timed fires.
    pub async fn run_now(&self) {
        self.fire(false).await;
    }

    async fn fire(&self, forced: bool) {
        let plan = self.state.lock().plan.clone();
        let built = match &plan.recipe_list {
            Some(list) => self.factory.run_recipe_list(list, plan.update_repos_first),
            None => self
                .factory
                .run_recipes(&plan.recipes, plan.update_repos_first),
        };
        let task = match built {
            Ok(task) if forced => task.forced(),
            Ok(task) => task,
            Err(e) => {
                self.sink
                    .notice("scheduled run skipped", &e.to_string())
                    .await;
                return;
            }
        };
        match self.queue.enqueue(Arc::new(task)).await {
            // Completion notices come from the queue; the fire does not
            // wait for the run.
            Ok(_rx) => {}
            Err(e) => {
                self.sink
                    .notice("scheduled run skipped", &e.to_string())
                    .await;
            }
        }
    }

    fn arm(&self, generation: u64) {
        let scheduler = self.clone();
        tokio::spawn(async move {
            loop {
                let (delay, forced) = {
                    let mut state = scheduler.state.lock();
                    if state.generation != generation {
                        return;
                    }
                    let now = scheduler.clock.wall();
                    match state.config.delay_from(now) {
                        Some(delay) => {
                            state.next_fire = state.config.next_fire_after(now);
                            (delay, state.config.forced)
                        }
                        None => {
                            state.next_fire = None;
                            return;
                        }
                    }
                };
                tokio::time::sleep(delay).await;
                if scheduler.state.lock().generation != generation {
                    return;
                }
                tracing::info!(generation, "schedule fired");
                scheduler.fire(forced).await;
            }
        });
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
