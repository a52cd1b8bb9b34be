// SPDX-License-Identifier: MIT

//! Task construction and lifecycle
//!
//! A [`Task`] binds one verb invocation: the argument vector, the
//! report file (for run verbs), and the interpretation of stdout into
//! progress events and typed results. Launch is one-shot; cancellation
//! is idempotent and resolves the task with a `Canceled` completion —
//! a task canceled before launch never spawns a process at all.

use crate::parser::{decode_for, DecodedResults, OutputParser};
use crate::report::read_report;
use parking_lot::Mutex;
use ph_adapters::{ProcessCanceler, ProcessExit, ProcessRunner, ProcessSpec, ProgressSink};
use ph_core::{
    RecipeListing, RepoEntry, RunReport, SearchHit, TaskCompletion, TaskError, TaskId, Verb,
};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

/// Builds tasks against one tool binary and one process runner.
#[derive(Clone)]
pub struct TaskFactory<P: ProcessRunner> {
    runner: P,
    binary: PathBuf,
}

impl<P: ProcessRunner> TaskFactory<P> {
    pub fn new(runner: P, binary: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// `autopkg run <recipe...>`, with fractional progress from the
    /// recipe count. Blank recipe names are dropped; an effectively
    /// empty list is rejected.
    pub fn run_recipes(
        &self,
        recipes: &[String],
        update_repos_first: bool,
    ) -> Result<Task<P>, TaskError> {
        let recipes: Vec<String> = recipes
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if recipes.is_empty() {
            return Err(TaskError::InvalidArguments("no recipes to run".to_string()));
        }
        let mut task = self.task(Verb::RunRecipes, recipes.clone())?;
        task.recipe_count = Some(recipes.len());
        task.update_repos_first = update_repos_first;
        Ok(task)
    }

    /// `autopkg run --recipe-list=<path>`. The recipe count is unknown,
    /// so progress stays indeterminate.
    pub fn run_recipe_list(
        &self,
        list: &Path,
        update_repos_first: bool,
    ) -> Result<Task<P>, TaskError> {
        let mut task = self.task(
            Verb::RunRecipeList,
            vec![format!("--recipe-list={}", list.display())],
        )?;
        task.update_repos_first = update_repos_first;
        Ok(task)
    }

    /// `autopkg repo-update all`.
    pub fn repo_update(&self) -> Result<Task<P>, TaskError> {
        self.task(Verb::RepoUpdate, vec!["all".to_string()])
    }

    /// `autopkg repo-add <url>`.
    pub fn repo_add(&self, url: &str) -> Result<Task<P>, TaskError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TaskError::InvalidArguments("repo url is empty".to_string()));
        }
        self.task(Verb::RepoAdd, vec![url.to_string()])
    }

    /// `autopkg repo-remove <repo>`.
    pub fn repo_remove(&self, repo: &str) -> Result<Task<P>, TaskError> {
        let repo = repo.trim();
        if repo.is_empty() {
            return Err(TaskError::InvalidArguments("repo name is empty".to_string()));
        }
        self.task(Verb::RepoRemove, vec![repo.to_string()])
    }

    /// `autopkg repo-list`.
    pub fn repo_list(&self) -> Result<Task<P>, TaskError> {
        self.task(Verb::RepoList, Vec::new())
    }

    /// `autopkg search <term>`. An empty or whitespace-only term is
    /// rejected here, before anything spawns.
    pub fn search(&self, term: &str) -> Result<Task<P>, TaskError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(TaskError::InvalidArguments(
                "search term is empty".to_string(),
            ));
        }
        self.task(Verb::Search, vec![term.to_string()])
    }

    /// `autopkg make-override <recipe>`.
    pub fn make_override(&self, recipe: &str) -> Result<Task<P>, TaskError> {
        let recipe = recipe.trim();
        if recipe.is_empty() {
            return Err(TaskError::InvalidArguments(
                "recipe name is empty".to_string(),
            ));
        }
        self.task(Verb::MakeOverride, vec![recipe.to_string()])
    }

    /// `autopkg list-recipes`.
    pub fn list_recipes(&self) -> Result<Task<P>, TaskError> {
        self.task(Verb::ListRecipes, Vec::new())
    }

    /// `autopkg version`.
    pub fn version(&self) -> Result<Task<P>, TaskError> {
        self.task(Verb::Version, Vec::new())
    }

    fn task(&self, verb: Verb, arguments: Vec<String>) -> Result<Task<P>, TaskError> {
        let report_file = if verb.produces_report() {
            let file = NamedTempFile::new().map_err(|e| TaskError::LaunchFailure {
                program: self.binary.display().to_string(),
                reason: format!("could not allocate report file: {e}"),
            })?;
            Some(file)
        } else {
            None
        };
        Ok(Task {
            id: TaskId::new(),
            verb,
            arguments,
            update_repos_first: false,
            recipe_count: None,
            runner: self.runner.clone(),
            binary: self.binary.clone(),
            report_file,
            state: Mutex::new(LaunchState::default()),
            collected: Mutex::new(Collected::default()),
        })
    }
}

#[derive(Default)]
struct LaunchState {
    launched: bool,
    cancel_requested: bool,
    canceler: Option<ProcessCanceler>,
}

#[derive(Default)]
struct Collected {
    stdout: String,
    stderr: String,
    report: Option<RunReport>,
    results: DecodedResults,
}

/// One verb invocation, from construction through completion.
pub struct Task<P: ProcessRunner> {
    id: TaskId,
    verb: Verb,
    arguments: Vec<String>,
    update_repos_first: bool,
    recipe_count: Option<usize>,
    runner: P,
    binary: PathBuf,
    // Holds the temp file open so the path stays valid for the child
    // and is removed once the task drops.
    report_file: Option<NamedTempFile>,
    state: Mutex<LaunchState>,
    collected: Mutex<Collected>,
}

impl<P: ProcessRunner> fmt::Debug for Task<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("verb", &self.verb)
            .finish_non_exhaustive()
    }
}

impl<P: ProcessRunner> Task<P> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Arguments following the subcommand, excluding the report path.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Where the run's report plist will be written, for run verbs.
    pub fn report_path(&self) -> Option<&Path> {
        self.report_file.as_ref().map(NamedTempFile::path)
    }

    /// Append `--force`, overriding the tool's stop-processing checks.
    pub fn forced(mut self) -> Self {
        self.arguments.push("--force".to_string());
        self
    }

    /// Request cancellation. Idempotent; safe from any thread. Before
    /// launch it prevents the process from ever spawning, during a run
    /// it terminates the process, and either way the task resolves with
    /// a `Canceled` completion.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if state.cancel_requested {
            return;
        }
        state.cancel_requested = true;
        if let Some(canceler) = &state.canceler {
            canceler.cancel();
        }
    }

    /// Run the task to completion, forwarding progress to `sink`.
    ///
    /// Resolves exactly once with the task's completion; it never
    /// panics across this boundary. A second launch of the same task is
    /// reported as a failed completion, not a spawn.
    pub async fn launch<S: ProgressSink>(&self, sink: &S) -> TaskCompletion {
        {
            let mut state = self.state.lock();
            if state.cancel_requested {
                return self.completion(Err(TaskError::Canceled));
            }
            if state.launched {
                return self.completion(Err(TaskError::InvalidArguments(
                    "task was already launched".to_string(),
                )));
            }
            state.launched = true;
        }
        tracing::info!(task = %self.id, verb = %self.verb, "task started");

        if self.update_repos_first {
            match self.run_update_pass(sink).await {
                Ok(()) => {}
                Err(TaskError::Canceled) => return self.completion(Err(TaskError::Canceled)),
                // A stale repo is not worth losing the run over.
                Err(e) => {
                    sink.notice("repo update before run failed", &e.to_string())
                        .await;
                }
            }
        }

        let outcome = self.run_main(sink).await;
        match &outcome {
            Ok(()) => tracing::info!(task = %self.id, "task succeeded"),
            Err(e) if e.is_canceled() => tracing::info!(task = %self.id, "task canceled"),
            Err(e) => tracing::warn!(task = %self.id, error = %e, "task failed"),
        }
        self.completion(outcome)
    }

    /// Run on the current thread, blocking until completion.
    ///
    /// Cancellation counts as success here: an operator stop is not an
    /// error to a synchronous caller.
    pub fn launch_blocking<S: ProgressSink>(&self, sink: &S) -> Result<(), TaskError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TaskError::LaunchFailure {
                program: self.binary.display().to_string(),
                reason: e.to_string(),
            })?;
        runtime.block_on(self.launch(sink)).blocking_outcome()
    }

    /// The decoded report, once a run verb has completed successfully.
    pub fn report(&self) -> Option<RunReport> {
        self.collected.lock().report.clone()
    }

    pub fn search_hits(&self) -> Option<Vec<SearchHit>> {
        match &self.collected.lock().results {
            DecodedResults::Search(hits) => Some(hits.clone()),
            _ => None,
        }
    }

    pub fn repo_entries(&self) -> Option<Vec<RepoEntry>> {
        match &self.collected.lock().results {
            DecodedResults::Repos(repos) => Some(repos.clone()),
            _ => None,
        }
    }

    pub fn recipe_names(&self) -> Option<Vec<RecipeListing>> {
        match &self.collected.lock().results {
            DecodedResults::Recipes(names) => Some(names.clone()),
            _ => None,
        }
    }

    /// Everything the main process wrote to stdout.
    pub fn stdout(&self) -> String {
        self.collected.lock().stdout.clone()
    }

    /// Buffered stderr from the main process.
    pub fn stderr(&self) -> String {
        self.collected.lock().stderr.clone()
    }

    fn completion(&self, outcome: Result<(), TaskError>) -> TaskCompletion {
        TaskCompletion {
            task_id: self.id,
            verb: self.verb,
            outcome,
        }
    }

    fn main_spec(&self) -> ProcessSpec {
        let mut spec = ProcessSpec::new(self.binary.clone())
            .arg(self.verb.command())
            .args(self.arguments.iter().cloned());
        if let Some(file) = &self.report_file {
            spec = spec.arg(format!("--report-plist={}", file.path().display()));
        }
        spec
    }

    async fn run_update_pass<S: ProgressSink>(&self, sink: &S) -> Result<(), TaskError> {
        let spec = ProcessSpec::new(self.binary.clone())
            .arg("repo-update")
            .arg("all");
        let mut parser = OutputParser::new();
        let exit = self.run_process(spec, &mut parser, sink).await?;
        if exit.canceled {
            return Err(TaskError::Canceled);
        }
        if exit.code != Some(0) {
            return Err(TaskError::ProcessFailure {
                code: exit.code,
                stderr: exit.stderr,
            });
        }
        Ok(())
    }

    async fn run_main<S: ProgressSink>(&self, sink: &S) -> Result<(), TaskError> {
        let mut parser = match self.recipe_count {
            Some(count) => OutputParser::with_recipe_count(count),
            None => OutputParser::new(),
        };
        let exit = self.run_process(self.main_spec(), &mut parser, sink).await?;

        let stdout = parser.stdout().to_string();
        {
            let mut collected = self.collected.lock();
            collected.stdout.clone_from(&stdout);
            collected.stderr.clone_from(&exit.stderr);
        }

        if exit.canceled {
            return Err(TaskError::Canceled);
        }
        if exit.code != Some(0) {
            return Err(TaskError::ProcessFailure {
                code: exit.code,
                stderr: exit.stderr,
            });
        }

        if let Some(file) = &self.report_file {
            let report = read_report(file.path())?;
            self.collected.lock().report = Some(report);
        }
        if self.verb.enumerates() {
            let decoded =
                decode_for(self.verb, &stdout).map_err(|e| TaskError::ReportDecodeFailure(e.0))?;
            self.collected.lock().results = decoded;
        }
        Ok(())
    }

    async fn run_process<S: ProgressSink>(
        &self,
        spec: ProcessSpec,
        parser: &mut OutputParser,
        sink: &S,
    ) -> Result<ProcessExit, TaskError> {
        let (tx, mut rx) = mpsc::channel(64);
        let program = spec.program.display().to_string();
        let handle =
            self.runner
                .spawn(spec, tx)
                .await
                .map_err(|e| TaskError::LaunchFailure {
                    program,
                    reason: e.to_string(),
                })?;

        {
            let mut state = self.state.lock();
            let canceler = handle.canceler();
            // Cancellation may have landed between the launch check and
            // the spawn; terminate immediately rather than letting the
            // process run unsupervised.
            if state.cancel_requested {
                canceler.cancel();
            }
            state.canceler = Some(canceler);
        }

        while let Some(chunk) = rx.recv().await {
            for progress in parser.feed(&chunk) {
                sink.progress(progress).await;
            }
        }
        if let Some(progress) = parser.finish() {
            sink.progress(progress).await;
        }

        let exit = handle.wait().await;
        self.state.lock().canceler = None;
        Ok(exit)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
