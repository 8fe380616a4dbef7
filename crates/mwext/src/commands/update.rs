//! Extension update command

use anyhow::{Context, Result};
use dialoguer::MultiSelect;
use mwext_extensions::batch::{self, UpdateOutcome, UpdateProgress};

use super::{Session, UsageError};
use crate::cli::UpdateArgs;
use crate::output;

/// Update installed extensions one at a time
///
/// Supports:
/// - Named extensions: `mwext update Foo Bar`
/// - Everything installed: `mwext update --all`
/// - Pick from the outdated ones: `mwext update`
pub async fn run(args: UpdateArgs) -> Result<()> {
    if args.all && !args.names.is_empty() {
        return Err(UsageError::NamesWithAll.into());
    }

    let session = Session::open()?;
    let names = if args.all {
        session.extensions.installed_names().await?
    } else if args.names.is_empty() {
        select_outdated(&session).await?
    } else {
        args.names
    };

    if names.is_empty() {
        output::info("Nothing to update");
        return Ok(());
    }

    let outcomes = batch::update(&session.extensions, &names, |progress| match progress {
        UpdateProgress::Started { name, source } => {
            output::header(&format!("Updating {} ({})", name, source));
        }
        UpdateProgress::Skipped { name } => {
            output::warning(&format!("Skipping {}: install source not recognized", name));
        }
    })
    .await?;

    let updated = outcomes
        .iter()
        .filter(|o| matches!(o, UpdateOutcome::Updated { .. }))
        .count();
    output::success(&format!("Updated {} of {} extensions", updated, outcomes.len()));
    Ok(())
}

/// Ask which of the extensions with pending updates to update
async fn select_outdated(session: &Session) -> Result<Vec<String>> {
    let names = session.extensions.installed_names().await?;
    let inspections = batch::inspect(&session.extensions, &names, true).await?;

    let mut candidates = Vec::new();
    let mut labels = Vec::new();
    for inspection in inspections {
        if let (Some(source), Some(update)) = (&inspection.source, &inspection.update) {
            labels.push(format!("{} ({})", inspection.name, source.update_summary(update)));
            candidates.push(inspection.name);
        }
    }

    if candidates.is_empty() {
        output::success("All extensions are up to date");
        return Ok(Vec::new());
    }

    let defaults = vec![true; candidates.len()];
    let chosen = MultiSelect::new()
        .with_prompt("Extensions to update")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context("Failed to get extension selection")?;

    Ok(chosen.into_iter().map(|i| candidates[i].clone()).collect())
}
