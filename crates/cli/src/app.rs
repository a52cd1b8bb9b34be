// SPDX-License-Identifier: MIT

//! Shared command context
//!
//! Every subcommand works through one [`App`]: settings loaded from
//! disk, a task factory bound to the configured binary, and a queue
//! gated on the real tool status.

use crate::console::ConsoleSink;
use anyhow::{Context, Result};
use ph_adapters::{AutoPkgStatus, LocalProcessRunner};
use ph_core::Settings;
use ph_engine::{RunPlan, TaskFactory, TaskQueue};
use std::path::PathBuf;

pub struct App {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub factory: TaskFactory<LocalProcessRunner>,
    pub queue: TaskQueue<LocalProcessRunner, AutoPkgStatus, ConsoleSink>,
    pub tool: AutoPkgStatus,
    pub sink: ConsoleSink,
}

impl App {
    pub fn load(config: Option<PathBuf>) -> Result<Self> {
        let settings_path = match config {
            Some(path) => path,
            None => default_settings_path()?,
        };
        let settings = Settings::load(&settings_path)
            .with_context(|| format!("loading settings from {}", settings_path.display()))?;
        tracing::debug!(path = %settings_path.display(), "settings loaded");

        let runner = LocalProcessRunner::new();
        let factory = TaskFactory::new(runner, settings.tool.binary.clone());
        let tool = AutoPkgStatus::from_settings(&settings.tool);
        let sink = ConsoleSink::new();
        let queue = TaskQueue::new(tool.clone(), sink.clone());

        Ok(Self {
            settings,
            settings_path,
            factory,
            queue,
            tool,
            sink,
        })
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings
            .save(&self.settings_path)
            .with_context(|| format!("saving settings to {}", self.settings_path.display()))?;
        Ok(())
    }

    /// What scheduled and default runs process.
    pub fn run_plan(&self) -> RunPlan {
        RunPlan {
            recipes: self.settings.recipes.clone(),
            recipe_list: self.settings.recipe_list.clone(),
            update_repos_first: self.settings.update_repos_first,
        }
    }
}

fn default_settings_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(base.join("packhorse").join("config.toml"))
}
