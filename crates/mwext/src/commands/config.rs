//! Config command

use anyhow::{Context, Result};
use mwext_core::{ConfigKey, ConfigStore};

use crate::cli::ConfigCommands;
use crate::output;

pub fn run(cmd: ConfigCommands) -> Result<()> {
    let mut store = ConfigStore::load_default().context("Failed to load configuration")?;

    match cmd {
        ConfigCommands::List => {
            output::header(&format!("Configuration ({})", store.path().display()));
            for (key, value) in store.entries() {
                output::kv(key.as_str(), value.unwrap_or("(not set)"));
            }
        }
        ConfigCommands::Get { key } => {
            let key: ConfigKey = key.parse()?;
            if let Some(value) = store.get(key) {
                println!("{}", value);
            }
        }
        ConfigCommands::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            store.set(key, value.as_str());
            store.save().context("Failed to save configuration")?;
            output::success(&format!("{} set to {}", key, value));
        }
        ConfigCommands::Reset { key } => {
            let key: ConfigKey = key.parse()?;
            if store.reset(key).is_some() {
                store.save().context("Failed to save configuration")?;
                output::success(&format!("{} reset", key));
            } else {
                output::info(&format!("{} was not set", key));
            }
        }
    }

    Ok(())
}
