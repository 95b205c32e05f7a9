// src/cli/handlers/list.rs

// The `projects`, `regions` and `stacks` actions: sorted, deduplicated name lists.

use anyhow::Result;
use clap::Parser;

use crate::{cli::dispatcher::AppContext, models::Workspace};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the distinct names of one hierarchy level.")]
struct ListArgs {
    /// Print the names as a JSON array.
    #[arg(long)]
    json: bool,
}

/// Prints the project names.
pub fn handle_projects(context: &AppContext, args: Vec<String>) -> Result<()> {
    print_names(context, args, Workspace::project_names)
}

/// Prints the distinct region names across all projects.
pub fn handle_regions(context: &AppContext, args: Vec<String>) -> Result<()> {
    print_names(context, args, Workspace::region_names)
}

/// Prints the distinct stack names across all regions.
pub fn handle_stacks(context: &AppContext, args: Vec<String>) -> Result<()> {
    print_names(context, args, Workspace::stack_names)
}

fn print_names(
    context: &AppContext,
    args: Vec<String>,
    names_of: fn(&Workspace) -> Vec<String>,
) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let names = names_of(&context.workspace);

    if list_args.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}
