// src/cli/handlers/mod.rs

// One module per action. Each handler parses its own arguments.

/// `browse`, the default action.
pub mod browse;
/// Selector resolution and the file picker shared by `show` and `run`.
pub mod commons;
/// `files`.
pub mod files;
/// `projects`, `regions` and `stacks`.
pub mod list;
/// `run`.
pub mod run;
/// `show`.
pub mod show;
/// `tree`.
pub mod tree;
