//! Setup command

use anyhow::Result;
use mwext_core::{Tool, ToolResolver};

use super::load_config;
use crate::output;

/// Resolve every external tool now, prompting for any that cannot be found
pub async fn run() -> Result<()> {
    load_config()?;
    let resolver = ToolResolver::global();

    output::header("External tools");
    for tool in Tool::ALL {
        let path = resolver.resolve(tool).await?;
        output::kv(tool.name(), &path.display().to_string());
    }

    output::success("Setup complete");
    Ok(())
}
