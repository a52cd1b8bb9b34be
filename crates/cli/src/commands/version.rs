// SPDX-License-Identifier: MIT

use super::run_task;
use crate::app::App;
use anyhow::Result;

pub async fn handle(app: &App) -> Result<()> {
    app.sink.silence();
    let task = run_task(app, app.factory.version()?).await?;
    println!("{}", task.stdout().trim());
    Ok(())
}
