//! Extension download command

use anyhow::{Context, Result};
use mwext_extensions::{batch, SourceKind};

use super::Session;
use crate::cli::DownloadArgs;
use crate::output;

/// Download extensions that are not installed yet
///
/// Supports:
/// - First advertised source: `mwext download Foo Bar`
/// - A specific source: `mwext download Foo --source git-rel`
/// - Replace an existing copy: `mwext download Foo --force`
pub async fn run(args: DownloadArgs) -> Result<()> {
    let preferred = args
        .source
        .as_deref()
        .map(str::parse::<SourceKind>)
        .transpose()?;

    let session = Session::open()?;
    let api = session.api()?;

    for name in &args.names {
        output::info(&format!("Downloading {}", name));
        let outcome = batch::download(&session.extensions, &api, name, preferred, args.force)
            .await
            .with_context(|| format!("Failed to download {}", name))?;

        if let Some(archived) = &outcome.archived {
            output::warning(&format!(
                "The previous copy of {} was moved to {}",
                name,
                archived.display()
            ));
        }
        output::success(&format!("Downloaded {} from {}", name, outcome.source));
    }

    Ok(())
}
