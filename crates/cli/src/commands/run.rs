// SPDX-License-Identifier: MIT

use super::run_task;
use crate::app::App;
use crate::output::{print_json, OutputFormat};
use anyhow::Result;
use ph_core::{RecipeStatus, RunReport};
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct RunArgs {
    /// Recipes to run (defaults to the configured recipes)
    pub recipes: Vec<String>,

    /// Run a recipe list file instead of named recipes
    #[arg(long, value_name = "FILE")]
    pub recipe_list: Option<PathBuf>,

    /// Update recipe repos first
    #[arg(long)]
    pub update_repos: bool,

    /// Run recipes even when nothing changed
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: RunArgs, app: &App, format: OutputFormat) -> Result<()> {
    let task = if let Some(list) = &args.recipe_list {
        app.factory.run_recipe_list(list, args.update_repos)?
    } else if !args.recipes.is_empty() {
        app.factory.run_recipes(&args.recipes, args.update_repos)?
    } else if let Some(list) = &app.settings.recipe_list {
        app.factory.run_recipe_list(list, args.update_repos)?
    } else {
        app.factory
            .run_recipes(&app.settings.recipes, args.update_repos)?
    };
    let task = if args.force { task.forced() } else { task };

    let task = run_task(app, task).await?;
    if let Some(report) = task.report() {
        print_report(&report, format)?;
    }
    Ok(())
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            if report.recipe_results.is_empty() {
                println!("Nothing processed.");
                return Ok(());
            }
            for result in &report.recipe_results {
                match result.status {
                    RecipeStatus::Success => println!(
                        "ok   {} ({} downloads)",
                        result.recipe_identifier, result.downloads_count
                    ),
                    RecipeStatus::Failure => println!(
                        "FAIL {}: {}",
                        result.recipe_identifier,
                        result.failure_message.as_deref().unwrap_or("unknown error")
                    ),
                    RecipeStatus::Skipped => println!("skip {}", result.recipe_identifier),
                }
                for warning in &result.warnings {
                    println!("     warning: {}", warning);
                }
            }
            let failed = report.failures().count();
            if failed > 0 {
                println!(
                    "{} of {} recipes failed",
                    failed,
                    report.recipe_results.len()
                );
            }
            Ok(())
        }
    }
}
