// SPDX-License-Identifier: MIT

use super::run_task;
use crate::app::App;
use crate::output::{print_json, OutputFormat};
use anyhow::Result;

#[derive(clap::Args)]
pub struct MakeOverrideArgs {
    /// Recipe to create an override for
    pub recipe: String,
}

pub async fn list(app: &App, format: OutputFormat) -> Result<()> {
    app.sink.silence();
    let task = run_task(app, app.factory.list_recipes()?).await?;
    let recipes = task.recipe_names().unwrap_or_default();

    match format {
        OutputFormat::Json => print_json(&recipes),
        OutputFormat::Text => {
            if recipes.is_empty() {
                println!("No recipes available.");
            }
            for recipe in &recipes {
                println!("{}", recipe.name);
            }
            Ok(())
        }
    }
}

pub async fn make_override(args: MakeOverrideArgs, app: &App) -> Result<()> {
    run_task(app, app.factory.make_override(&args.recipe)?).await?;
    Ok(())
}
