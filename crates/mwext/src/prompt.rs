//! Interactive executable prompt

use anyhow::{bail, Context, Result};
use console::Term;
use dialoguer::Input;
use mwext_core::{ExecutablePrompt, Tool};
use std::path::PathBuf;

use crate::output;

/// Asks on the terminal for the path to a tool that could not be found
pub struct TerminalPrompt;

impl ExecutablePrompt for TerminalPrompt {
    fn ask(&self, tool: Tool, problem: &str) -> Result<Option<PathBuf>> {
        if !Term::stderr().is_term() {
            bail!("{} (not running interactively)", problem);
        }

        output::warning(problem);
        let answer: String = Input::new()
            .with_prompt(format!("Path to {} (leave empty to cancel)", tool))
            .allow_empty(true)
            .interact_text()
            .context("Failed to read executable path")?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }
}
