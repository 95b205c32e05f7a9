use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::dispatcher::AppContext,
    core::{
        tree_display::{self, DisplayOptions},
        workspace::SkippedFile,
    },
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the workspace hierarchy as a tree."
)]
struct TreeArgs {
    /// List the files under each stack.
    #[arg(long, short)]
    files: bool,

    /// Show full file paths instead of directory names (implies --files).
    #[arg(long, short)]
    paths: bool,

    /// Limit the depth of the tree display (1 = projects only).
    #[arg(long, short)]
    depth: Option<usize>,

    /// Also list the files that were skipped while indexing, with the reason.
    #[arg(long)]
    skipped: bool,
}

/// Prints the indexed hierarchy, and the skipped files when asked for.
pub fn handle(context: &AppContext, args: Vec<String>) -> Result<()> {
    let tree_args = TreeArgs::try_parse_from(&args)?;

    let display_options = DisplayOptions {
        show_files: tree_args.files || tree_args.paths,
        show_paths: tree_args.paths,
        max_depth: tree_args.depth,
    };

    println!(
        "\n{}",
        format!(
            t!("tree.header"),
            root = context.root.display().to_string().cyan(),
            count = context.workspace.file_count()
        )
    );

    if context.workspace.is_empty() {
        println!("{}", t!("workspace.empty").yellow());
    } else {
        print!(
            "{}",
            tree_display::render_workspace_tree(&context.workspace, &display_options)
        );
    }

    if tree_args.skipped && !context.report.skipped.is_empty() {
        println!("\n{}", t!("tree.header.skipped").yellow().bold());
        print!("{}", render_skipped(&context.report.skipped));
    }
    Ok(())
}

/// One indented line per skipped file, with the reason in parentheses.
fn render_skipped(skipped: &[SkippedFile]) -> String {
    skipped
        .iter()
        .map(|file| format!("  {} ({})\n", file.path.display(), file.reason))
        .collect()
}
