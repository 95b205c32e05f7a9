// src/core/mod.rs

/// Maps a path to its coordinate.
pub mod classifier;
/// Loading and validation of `config.toml`.
pub mod config;
/// Read-only lookups over a built workspace.
pub mod query;
/// Recursive discovery of definition files.
pub mod scanner;
/// Text rendering of the hierarchy.
pub mod tree_display;
pub mod workspace;
