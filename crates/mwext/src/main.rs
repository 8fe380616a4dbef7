//! mwext CLI - Manage where MediaWiki extensions are installed from
//!
//! This is the main entry point for the mwext command-line interface.

mod cli;
mod commands;
mod output;
mod prompt;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Config(cmd) => commands::config::run(cmd),
        Commands::Setup => commands::setup::run().await,
        Commands::Info(args) => commands::info::run(args).await,
        Commands::List(args) => commands::list::run(args).await,
        Commands::Outdated(args) => commands::outdated::run(args).await,
        Commands::Download(args) => commands::download::run(args).await,
        Commands::Update(args) => commands::update::run(args).await,
        Commands::Switch(args) => commands::switch::run(args).await,
    }
}

/// Print a failure; known failures show their message and code only
fn report(e: &anyhow::Error) {
    match commands::error_code(e) {
        Some(code) => output::error(&format!("{:#} ({})", e, code)),
        None => output::error(&format!("{:?}", e)),
    }
}

/// Initialize tracing with appropriate verbosity
///
/// `RUST_LOG` takes precedence over the verbosity flags when set.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("warn"),
                1 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
