//! Extension info command

use anyhow::Result;
use mwext_extensions::ExtensionApi;

use super::Session;
use crate::cli::InfoArgs;
use crate::output;

/// Show the installed copy and the service record of an extension
///
/// Supports:
/// - Both views: `mwext info Foo`
/// - Installed copy only: `mwext info Foo --local`
/// - Service record only: `mwext info Foo --remote`
pub async fn run(args: InfoArgs) -> Result<()> {
    let session = Session::open()?;
    let show_local = !args.remote;
    let show_remote = !args.local;

    if show_local {
        local(&session, &args.name).await?;
    }
    if show_remote {
        remote(&session, &args.name).await?;
    }
    Ok(())
}

async fn local(session: &Session, name: &str) -> Result<()> {
    let ext = session.extensions.resolve(name).await?;
    let source = ext.detect_source().await?;

    output::header(&format!("{} (installed)", name));
    output::kv("Path", &ext.dir().display().to_string());

    let Some(source) = source else {
        output::kv("Install source", "unknown");
        return Ok(());
    };

    output::kv("Install source", source.name());
    for line in source.info_lines() {
        output::line(&line);
    }

    let spinner = output::spinner("Checking for updates...");
    let update = source.check_for_update().await;
    spinner.finish_and_clear();

    for line in source.update_lines(update?.as_ref()) {
        output::line(&line);
    }
    Ok(())
}

async fn remote(session: &Session, name: &str) -> Result<()> {
    let record = session.api()?.get_extension(name).await?;

    output::header(&format!("{} (extension service)", record.name));
    if let Some(id) = &record.id {
        output::kv("Id", id);
    }
    output::kv(
        "Install sources",
        &if record.sources.is_empty() {
            "none".to_string()
        } else {
            record.sources.join(", ")
        },
    );
    if let Some(repository) = &record.repository {
        output::kv("Repository", repository);
    }
    if let Some(package) = &record.composer_name {
        output::kv("Composer package", package);
    }
    if let Some(hint) = &record.version_hint {
        output::kv("Version hint", hint);
    }
    Ok(())
}
