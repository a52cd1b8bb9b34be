// SPDX-License-Identifier: MIT

use super::run_task;
use crate::app::App;
use crate::output::{print_json, OutputFormat};
use anyhow::Result;

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Name or partial name to search for
    pub term: String,
}

pub async fn handle(args: SearchArgs, app: &App, format: OutputFormat) -> Result<()> {
    app.sink.silence();
    let task = run_task(app, app.factory.search(&args.term)?).await?;
    let hits = task.search_hits().unwrap_or_default();

    match format {
        OutputFormat::Json => print_json(&hits),
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("No recipes found for '{}'.", args.term);
                return Ok(());
            }
            let recipe_width = hits.iter().map(|h| h.recipe.len()).max().unwrap_or(0);
            let repo_width = hits.iter().map(|h| h.repo.len()).max().unwrap_or(0);
            for hit in &hits {
                println!(
                    "{:recipe_width$}  {:repo_width$}  {}",
                    hit.recipe, hit.repo, hit.repo_path
                );
            }
            Ok(())
        }
    }
}
