//! Common test utilities for mwext-extensions
//!
//! This module provides shared test infrastructure including:
//! - Scratch MediaWiki installs and local upstream git repositories
//! - In-memory stand-ins for Packagist, Composer and the metadata API

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
