// SPDX-License-Identifier: MIT

use crate::app::App;
use crate::output::{print_json, OutputFormat};
use anyhow::{bail, Context, Result};
use chrono::{Local, Weekday};
use clap::Subcommand;
use ph_core::{ScheduleConfig, ScheduleMode, SystemClock};
use ph_engine::RunScheduler;

#[derive(clap::Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Show the configured schedule
    Show,
    /// Enable and configure scheduled runs
    Set(SetArgs),
    /// Disable scheduled runs
    Off,
    /// Run the scheduler in the foreground until interrupted
    Run,
}

#[derive(clap::Args)]
pub struct SetArgs {
    /// Fire every N seconds
    #[arg(long, value_name = "SECONDS", conflicts_with_all = ["daily", "weekly"])]
    pub interval: Option<u64>,

    /// Fire daily at this hour (0-23)
    #[arg(long, value_name = "HOUR", conflicts_with = "weekly")]
    pub daily: Option<u32>,

    /// Fire weekly, e.g. "mon@9"
    #[arg(long, value_name = "DAY@HOUR")]
    pub weekly: Option<String>,

    /// Run recipes even when nothing changed
    #[arg(long)]
    pub force: bool,
}

pub async fn handle(args: ScheduleArgs, app: &mut App, format: OutputFormat) -> Result<()> {
    match args.command {
        ScheduleCommand::Show => show(app, format),
        ScheduleCommand::Set(set) => {
            let config = ScheduleConfig {
                enabled: true,
                mode: mode_from(&set)?,
                forced: set.force,
            };
            config.validate()?;
            app.settings.schedule = config;
            app.save_settings()?;
            match config.next_fire_after(Local::now().naive_local()) {
                Some(next) => println!("Schedule saved; next run at {}", next),
                None => println!("Schedule saved (disarmed)."),
            }
            Ok(())
        }
        ScheduleCommand::Off => {
            app.settings.schedule.enabled = false;
            app.save_settings()?;
            println!("Schedule disabled.");
            Ok(())
        }
        ScheduleCommand::Run => run_foreground(app).await,
    }
}

fn mode_from(set: &SetArgs) -> Result<ScheduleMode> {
    if let Some(seconds) = set.interval {
        return Ok(ScheduleMode::Interval { seconds });
    }
    if let Some(hour) = set.daily {
        return Ok(ScheduleMode::DailyAtHour { hour });
    }
    if let Some(spec) = &set.weekly {
        let (day, hour) = spec
            .split_once('@')
            .context("expected DAY@HOUR, e.g. mon@9")?;
        let weekday: Weekday = day.parse().ok().context("unrecognized weekday")?;
        let hour: u32 = hour.parse().context("hour must be a number")?;
        return Ok(ScheduleMode::WeeklyAtHour { weekday, hour });
    }
    bail!("one of --interval, --daily, or --weekly is required");
}

fn show(app: &App, format: OutputFormat) -> Result<()> {
    let config = app.settings.schedule;
    match format {
        OutputFormat::Json => print_json(&config),
        OutputFormat::Text => {
            if !config.is_armed() {
                println!("Schedule is off.");
                return Ok(());
            }
            let cadence = match config.mode {
                ScheduleMode::Interval { seconds } => format!("every {} seconds", seconds),
                ScheduleMode::DailyAtHour { hour } => format!("daily at {:02}:00", hour),
                ScheduleMode::WeeklyAtHour { weekday, hour } => {
                    format!("every {} at {:02}:00", weekday, hour)
                }
            };
            println!(
                "Scheduled runs {}{}",
                cadence,
                if config.forced { " (forced)" } else { "" }
            );
            if let Some(next) = config.next_fire_after(Local::now().naive_local()) {
                println!("Next run at {}", next);
            }
            Ok(())
        }
    }
}

async fn run_foreground(app: &App) -> Result<()> {
    let config = app.settings.schedule;
    if !config.is_armed() {
        bail!("schedule is off; enable one with `ph schedule set`");
    }

    let scheduler = RunScheduler::new(
        app.queue.clone(),
        app.factory.clone(),
        app.sink.clone(),
        SystemClock,
        app.run_plan(),
    );
    scheduler.configure(config)?;
    if let Some(next) = scheduler.next_fire() {
        println!("Next run at {}; press Ctrl-C to stop.", next);
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    scheduler.stop();
    app.queue.cancel_all();
    println!("Stopped.");
    Ok(())
}
