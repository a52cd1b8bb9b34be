// SPDX-License-Identifier: MIT

use super::run_task;
use crate::app::App;
use crate::output::{print_json, OutputFormat};
use anyhow::Result;
use clap::Subcommand;

#[derive(clap::Args)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub command: RepoCommand,
}

#[derive(Subcommand)]
pub enum RepoCommand {
    /// Add a recipe repo by URL
    Add { url: String },
    /// Remove a recipe repo
    Remove { repo: String },
    /// List installed recipe repos
    List,
    /// Update all recipe repos
    Update,
}

pub async fn handle(args: RepoArgs, app: &App, format: OutputFormat) -> Result<()> {
    match args.command {
        RepoCommand::Add { url } => {
            run_task(app, app.factory.repo_add(&url)?).await?;
            println!("Added {}", url);
        }
        RepoCommand::Remove { repo } => {
            run_task(app, app.factory.repo_remove(&repo)?).await?;
            println!("Removed {}", repo);
        }
        RepoCommand::Update => {
            run_task(app, app.factory.repo_update()?).await?;
            println!("Repos updated.");
        }
        RepoCommand::List => {
            app.sink.silence();
            let task = run_task(app, app.factory.repo_list()?).await?;
            let repos = task.repo_entries().unwrap_or_default();
            match format {
                OutputFormat::Json => print_json(&repos)?,
                OutputFormat::Text => {
                    if repos.is_empty() {
                        println!("No recipe repos installed.");
                    }
                    for repo in &repos {
                        println!("{} ({})", repo.path.display(), repo.url);
                    }
                }
            }
        }
    }
    Ok(())
}
