use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;

use crate::{
    cli::dispatcher::AppContext,
    constants::ALL_SELECTOR,
    core::query::{FilterCriteria, Selector},
    models::TerragruntFile,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists the indexed files as a table, optionally filtered."
)]
struct FilesArgs {
    /// Only files of this region (`All` for every region).
    #[arg(long, short, default_value = ALL_SELECTOR)]
    region: String,

    /// Only files of this project.
    #[arg(long, short, default_value = ALL_SELECTOR)]
    project: String,

    /// Only files of this stack.
    #[arg(long, short, default_value = ALL_SELECTOR)]
    stack: String,

    /// Print the rows as JSON.
    #[arg(long)]
    json: bool,
}

/// One row of the file table.
#[derive(Serialize, Debug, PartialEq, Eq)]
struct FileRow {
    resource: String,
    stack: String,
    region: String,
    project: String,
    path: String,
}

impl From<&TerragruntFile> for FileRow {
    fn from(file: &TerragruntFile) -> Self {
        Self {
            resource: file.resource_name(),
            stack: file.stack_id().to_string(),
            region: file.region_id().to_string(),
            project: file.project_id().to_string(),
            path: file.path().display().to_string(),
        }
    }
}

/// Prints the files matching the filters as a table or JSON.
pub fn handle(context: &AppContext, args: Vec<String>) -> Result<()> {
    let files_args = FilesArgs::try_parse_from(&args)?;

    let criteria = FilterCriteria {
        project: Selector::parse(&files_args.project),
        region: Selector::parse(&files_args.region),
        stack: Selector::parse(&files_args.stack),
    };
    let rows: Vec<FileRow> = context
        .workspace
        .filter_files(&criteria)
        .into_iter()
        .map(FileRow::from)
        .collect();

    if files_args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", t!("files.none").yellow());
        return Ok(());
    }

    let lines = render_table(&rows);
    if let Some((header, body)) = lines.split_first() {
        println!("{}", header.bold());
        for line in body {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Aligns the rows in columns. The first line is the header.
fn render_table(rows: &[FileRow]) -> Vec<String> {
    let header = ["RESOURCE", "STACK", "REGION", "PROJECT"];
    let cells: Vec<[&str; 4]> = rows
        .iter()
        .map(|r| [r.resource.as_str(), r.stack.as_str(), r.region.as_str(), r.project.as_str()])
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(header)
        .chain(cells)
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}
