//! # mwext-git
//!
//! Git facade used by the mwext install sources:
//! - [`GitRepo`] bound to a single extension directory
//! - Typed queries (revisions, branches, tags, remotes)
//! - Pass-through operations that stream git's output (clone, checkout, fetch, merge, pull)
//!
//! The git executable is resolved once per process through
//! [`mwext_core::ToolResolver::global`] before the first command runs.
//!
//! # Examples
//!
//! ```no_run
//! use mwext_git::{GitOptions, GitRepo};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = GitRepo::new("/var/www/w/extensions/Foo");
//! let remote = repo.origin().await?;
//! repo.fetch(Some(&remote), Some("master")).await?;
//! repo.pull(Some(&remote), None, &GitOptions::new().flag("ff-only", true)).await?;
//! # Ok(())
//! # }
//! ```

mod command;
pub mod error;
mod options;
mod repo;
mod sync;

pub use command::GitCommand;
pub use error::{Error, Result};
pub use options::{GitOptions, OptionValue};
pub use repo::GitRepo;
