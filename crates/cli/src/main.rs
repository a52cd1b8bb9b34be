// SPDX-License-Identifier: MIT

//! ph - packhorse CLI

mod app;
mod commands;
mod console;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{recipes, repo, run, schedule, search, status, version};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ph",
    version,
    about = "packhorse - autopkg run orchestration"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run recipes now
    Run(run::RunArgs),
    /// Recipe repo management
    Repo(repo::RepoArgs),
    /// Search the recipe repos
    Search(search::SearchArgs),
    /// List recipes available locally
    ListRecipes,
    /// Create an override for a recipe
    MakeOverride(recipes::MakeOverrideArgs),
    /// Scheduled run management
    Schedule(schedule::ScheduleArgs),
    /// Show autopkg install status
    Status,
    /// Show the autopkg version
    Version,
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // No subcommand provided — print help and exit 0
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let mut app = app::App::load(cli.config)?;
    match command {
        Commands::Run(args) => run::handle(args, &app, format).await,
        Commands::Repo(args) => repo::handle(args, &app, format).await,
        Commands::Search(args) => search::handle(args, &app, format).await,
        Commands::ListRecipes => recipes::list(&app, format).await,
        Commands::MakeOverride(args) => recipes::make_override(args, &app).await,
        Commands::Schedule(args) => schedule::handle(args, &mut app, format).await,
        Commands::Status => status::handle(&app, format).await,
        Commands::Version => version::handle(&app).await,
    }
}
