//! Progress command handler.

use anyhow::{Context, Result};

use super::report;
use crate::cli::App;

pub async fn show(app: &App) -> Result<()> {
    let progress = app.client.progress().await.map_err(report)?;

    let rendered =
        serde_json::to_string_pretty(&progress).context("Failed to render progress")?;
    println!("{}", rendered);
    Ok(())
}
