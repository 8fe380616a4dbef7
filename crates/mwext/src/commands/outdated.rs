//! Outdated extensions command

use anyhow::{Context, Result};
use mwext_extensions::{batch, UpdateInfo};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Session;
use crate::cli::ListArgs;
use crate::output;

#[derive(Tabled, Serialize)]
struct OutdatedRow {
    name: String,
    source: String,
    update: String,
    #[tabled(skip)]
    #[serde(rename = "details")]
    info: UpdateInfo,
}

/// List installed extensions with pending updates
pub async fn run(args: ListArgs) -> Result<()> {
    let session = Session::open()?;
    let names = session
        .extensions
        .installed_names()
        .await
        .context("Failed to read the extensions directory")?;

    output::info(&format!("Checking {} extensions for updates", names.len()));
    let inspections = batch::inspect(&session.extensions, &names, true).await?;

    let rows: Vec<OutdatedRow> = inspections
        .into_iter()
        .filter_map(|inspection| {
            let source = inspection.source?;
            let info = inspection.update?;
            Some(OutdatedRow {
                name: inspection.name,
                source: source.name().to_string(),
                update: source.update_summary(&info),
                info,
            })
        })
        .collect();

    if args.json {
        let json =
            serde_json::to_string_pretty(&rows).context("Failed to serialize updates to JSON")?;
        println!("{}", json);
    } else if rows.is_empty() {
        output::success("All extensions are up to date");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    Ok(())
}
