use clap::Parser;
use thiserror::Error;

/// The action registry and the shared handler context.
pub mod dispatcher;
/// One module per action.
pub mod handlers;
/// State kept for the length of one browse session.
pub mod session;

/// Errors raised before an action handler gets control.
#[derive(Error, Debug)]
pub enum CliError {
    /// The positional root argument was omitted.
    #[error("No root directory given. Usage: tgr <root> [action] [args...]")]
    MissingRoot,
    /// The first trailing argument is not a registered action or alias.
    #[error("Unknown action '{name}'. Available actions: {available}.")]
    UnknownAction {
        /// The action as typed.
        name: String,
        /// Comma-separated registered action names.
        available: String,
    },
}

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces the semantic tags of the help template with ANSI styles.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// tgr: browse a Terragrunt workspace by project, region and stack.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to a configuration file, overriding $TGR_CONFIG and the default location.
    #[arg(long, short)]
    pub config: Option<String>,

    /// Root directory of the Terragrunt repository.
    pub root: Option<String>,

    /// The action followed by its own arguments. Defaults to `browse`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
