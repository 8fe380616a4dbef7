//! Extension list command

use anyhow::{Context, Result};
use mwext_extensions::batch;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Session;
use crate::cli::ListArgs;
use crate::output;

/// Row for an installed extension
#[derive(Tabled, Serialize)]
struct InstalledRow {
    name: String,
    source: String,
    version: String,
}

/// List installed extensions with their install sources
///
/// Supports:
/// - Table output: `mwext list`
/// - JSON output: `mwext list --json`
pub async fn run(args: ListArgs) -> Result<()> {
    let session = Session::open()?;
    let names = session
        .extensions
        .installed_names()
        .await
        .context("Failed to read the extensions directory")?;

    let spinner = output::spinner("Detecting install sources...");
    let inspections = batch::inspect(&session.extensions, &names, false).await;
    spinner.finish_and_clear();

    let rows: Vec<InstalledRow> = inspections?
        .into_iter()
        .map(|inspection| InstalledRow {
            source: inspection
                .source
                .as_ref()
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| "-".to_string()),
            version: inspection
                .source
                .as_ref()
                .and_then(|s| s.list_info())
                .unwrap_or_else(|| "-".to_string()),
            name: inspection.name,
        })
        .collect();

    if args.json {
        let json =
            serde_json::to_string_pretty(&rows).context("Failed to serialize extensions to JSON")?;
        println!("{}", json);
    } else if rows.is_empty() {
        output::info("No extensions installed");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    Ok(())
}
