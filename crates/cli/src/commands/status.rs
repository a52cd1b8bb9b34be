// SPDX-License-Identifier: MIT

use crate::app::App;
use crate::output::{print_json, OutputFormat};
use anyhow::Result;
use ph_adapters::ToolStatus;
use serde::Serialize;

#[derive(Serialize)]
struct ToolReport {
    installed: bool,
    version: Option<String>,
    ready: bool,
    problem: Option<String>,
}

pub async fn handle(app: &App, format: OutputFormat) -> Result<()> {
    let installed = app.tool.installed().await;
    let version = app.tool.version().await.map(|v| v.to_string());
    let problem = app.tool.meets_requirements().await.err().map(|e| e.0);

    let report = ToolReport {
        installed,
        version,
        ready: problem.is_none(),
        problem,
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!(
                "autopkg: {}",
                if report.installed {
                    "installed"
                } else {
                    "not installed"
                }
            );
            if let Some(version) = &report.version {
                println!("version: {}", version);
            }
            match &report.problem {
                None => println!("ready"),
                Some(problem) => println!("problem: {}", problem),
            }
            Ok(())
        }
    }
}
