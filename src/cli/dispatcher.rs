use anyhow::Result;
use std::path::PathBuf;

use crate::{
    cli::{CliError, handlers},
    core::{config::RunnerConfig, workspace::BuildReport},
    models::Workspace,
};

/// Everything a handler needs: the scanned workspace and the configuration it came from.
/// Built once in `main` and read-only afterwards.
#[derive(Debug)]
pub struct AppContext {
    /// The expanded root directory given on the command line.
    pub root: PathBuf,
    /// The loaded configuration.
    pub config: RunnerConfig,
    /// The index built from `root`.
    pub workspace: Workspace,
    /// What the build found and what it left out.
    pub report: BuildReport,
}

// --- Command Definition and Registry ---

/// Defines an action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(&AppContext, Vec<String>) -> Result<()>,
}

/// The action used when only a root is given.
const DEFAULT_ACTION: &str = "browse";

/// The single source of truth for all actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "browse",
        aliases: &["ui"],
        handler: handlers::browse::handle,
    },
    CommandDefinition {
        name: "files",
        aliases: &[],
        handler: handlers::files::handle,
    },
    CommandDefinition {
        name: "projects",
        aliases: &[],
        handler: handlers::list::handle_projects,
    },
    CommandDefinition {
        name: "regions",
        aliases: &[],
        handler: handlers::list::handle_regions,
    },
    CommandDefinition {
        name: "run",
        aliases: &["exec"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &["cat"],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "stacks",
        aliases: &[],
        handler: handlers::list::handle_stacks,
    },
    CommandDefinition {
        name: "tree",
        aliases: &["ls"],
        handler: handlers::tree::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Names of every registered action, in registry order.
pub fn action_names() -> Vec<&'static str> {
    COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect()
}

/// Routes `tgr <root> [action] [args...]`: the first argument names the action and the
/// rest belong to its handler.
pub fn dispatch(args: Vec<String>, context: &AppContext) -> Result<()> {
    log::debug!("Dispatching args: {:?}", args);

    let mut args = args.into_iter();
    let action = args.next().unwrap_or_else(|| DEFAULT_ACTION.to_string());

    let command = find_command(&action).ok_or_else(|| CliError::UnknownAction {
        name: action.clone(),
        available: action_names().join(", "),
    })?;

    (command.handler)(context, args.collect())
}
