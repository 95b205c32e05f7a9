// src/bin/tgr.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use terragrunt_runner::{
    cli::{
        Cli, CliError,
        dispatcher::{self, AppContext},
    },
    core::config,
    models::Workspace,
    system::dispatch::DispatchError,
    t,
};

/// The main entry point of `tgr`.
/// It sets up logging, scans the workspace, dispatches to the requested action,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // --- Centralized Error Handling ---
        // Ctrl+C at a prompt or while waiting for a run exits silently, like a shell would.
        let interrupted_wait = matches!(
            e.downcast_ref::<DispatchError>(),
            Some(DispatchError::Interrupted)
        );
        let interrupted_prompt = matches!(
            e.downcast_ref::<dialoguer::Error>(),
            Some(dialoguer::Error::IO(io)) if io.kind() == std::io::ErrorKind::Interrupted
        );
        if interrupted_wait || interrupted_prompt {
            std::process::exit(130);
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Loads the configuration, indexes the workspace under the root, and hands over to the
/// action dispatcher.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let root_arg = cli.root.ok_or(CliError::MissingRoot)?;
    let config = config::load(cli.config.as_deref())?;
    let root = config::expand_path(&root_arg)?;

    let (workspace, report) = Workspace::build_with_report(&root, &config.scan)
        .with_context(|| format!("Failed to scan '{}'", root.display()))?;

    if !report.skipped.is_empty() {
        eprintln!(
            "{}",
            format!(
                t!("scan.warning.skipped"),
                count = report.skipped.len(),
                candidates = report.candidates
            )
            .yellow()
        );
    }

    let context = AppContext {
        root,
        config,
        workspace,
        report,
    };
    dispatcher::dispatch(cli.args, &context)
}
