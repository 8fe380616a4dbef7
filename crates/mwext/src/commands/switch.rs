//! Install source switch command

use anyhow::{anyhow, Context, Result};
use dialoguer::Select;
use mwext_core::RemoteExtension;
use mwext_extensions::batch::{self, SwitchOutcome};
use mwext_extensions::{ExtensionApi, SourceKind};

use super::Session;
use crate::cli::SwitchArgs;
use crate::output;

/// Switch an installed extension to another install source
///
/// Without a source, the sources advertised for the extension are offered.
pub async fn run(args: SwitchArgs) -> Result<()> {
    let session = Session::open()?;
    let local = session.extensions.resolve(&args.name).await?;
    let remote = session.api()?.get_extension(&args.name).await?;

    let target = match args.source.as_deref() {
        Some(name) => name.parse::<SourceKind>()?,
        None => {
            let current = local.detect_source().await?.map(|s| s.kind());
            choose_target(&remote, current)?
        }
    };

    let outcome = match batch::switch(&local, &remote, target, args.force).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(hint) = force_hint(&e) {
                output::warning(hint);
            }
            return Err(e)
                .with_context(|| format!("Failed to switch {} to {}", args.name, target));
        }
    };

    if let SwitchOutcome::Replaced { archived } = &outcome {
        match archived {
            Some(path) => output::warning(&format!(
                "{} was downloaded again; the previous copy was moved to {}",
                args.name,
                path.display()
            )),
            None => output::warning(&format!(
                "{} was removed and downloaded again",
                args.name
            )),
        }
    }
    output::success(&format!("{} now uses {}", args.name, target));
    Ok(())
}

/// Suggestion shown when only a forced replace can complete the switch
fn force_hint(e: &mwext_extensions::Error) -> Option<&'static str> {
    e.is_unsupported_switch()
        .then_some("Run with --force to delete and replace the existing extension.")
}

fn choose_target(remote: &RemoteExtension, current: Option<SourceKind>) -> Result<SourceKind> {
    let choices: Vec<SourceKind> = remote
        .sources
        .iter()
        .filter_map(|name| SourceKind::from_name(name))
        .filter(|kind| Some(*kind) != current)
        .collect();

    if choices.is_empty() {
        return Err(anyhow!(
            "{} has no other install source to switch to",
            remote.name
        ));
    }

    let labels: Vec<&str> = choices.iter().map(|kind| kind.name()).collect();
    let index = Select::new()
        .with_prompt("Switch to")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to get install source selection")?;

    Ok(choices[index])
}
