//! `tgr`: indexes a Terragrunt repository by project, region and stack, and runs
//! Terragrunt against a selected file.
//!
//! The library holds everything but process startup, so the binary in `src/bin/tgr.rs`
//! only parses arguments, builds the [`cli::dispatcher::AppContext`] and dispatches.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Argument parsing, the action registry and the action handlers.
pub mod cli;
/// Defaults shared across the crate.
pub mod constants;
/// Scanning, classification, indexing, querying and configuration.
pub mod core;
/// The workspace hierarchy.
pub mod models;
pub mod system;
