//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

/// mwext - Manage where MediaWiki extensions are installed from
#[derive(Parser, Debug)]
#[command(name = "mwext")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the install source and update status of an extension
    Info(InfoArgs),

    /// List installed extensions and their install sources
    List(ListArgs),

    /// List installed extensions with available updates
    Outdated(ListArgs),

    /// Download extensions that are not installed yet
    Download(DownloadArgs),

    /// Update installed extensions
    Update(UpdateArgs),

    /// Switch an installed extension to another install source
    Switch(SwitchArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Locate php, git and composer and remember their paths
    Setup,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Extension name
    pub name: String,

    /// Only show the installed copy
    #[arg(long, conflicts_with = "remote")]
    pub local: bool,

    /// Only show the extension service record
    #[arg(long)]
    pub remote: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Extension names
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Install source to download from (defaults to the first one advertised)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Move an existing copy out of the way instead of failing
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Extension names (prompts for a selection when omitted)
    pub names: Vec<String>,

    /// Update every installed extension
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Extension name
    pub name: String,

    /// Install source to switch to (prompts when omitted)
    pub source: Option<String>,

    /// Replace the extension when it cannot be switched in place
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show all configuration values
    List,

    /// Print a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Remove a configuration value
    Reset {
        /// Configuration key
        key: String,
    },
}
