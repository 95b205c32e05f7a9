use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::cli::{dispatcher::AppContext, handlers::commons, session::FileItem};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Prints the content of a Terragrunt file.")]
struct ShowArgs {
    /// A file path or a `project/region/stack` selector.
    selector: String,
}

/// Prints the content of one selected file.
pub fn handle(context: &AppContext, args: Vec<String>) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let file = commons::resolve_selector(&context.workspace, &show_args.selector)?;
    let item = FileItem::new(file);

    println!("{} {}", item.title().green().bold(), item.description().dimmed());
    println!("{}", item.rendered_content());
    Ok(())
}
