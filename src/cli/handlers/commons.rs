// src/cli/handlers/commons.rs

// Shared helpers used by several handlers.

use anyhow::Result;
use dialoguer::{Select, theme::ColorfulTheme};
use std::path::Path;
use thiserror::Error;

use crate::{
    cli::session::FileItem,
    models::{Coordinate, TerragruntFile, Workspace},
};

/// Why a selector did not lead to a file.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// The path exists on disk but is not in the index.
    #[error("'{path}' is not an indexed Terragrunt file.")]
    NotIndexed {
        /// The path as given.
        path: String,
    },
    /// No stack at this coordinate.
    #[error("Stack '{coordinate}' does not exist or holds no files.")]
    UnknownStack {
        /// The coordinate as `project/region/stack`.
        coordinate: String,
    },
    /// Neither an existing path nor a three-part selector.
    #[error("'{selector}' is neither a file path nor a project/region/stack selector.")]
    Invalid {
        /// The selector as given.
        selector: String,
    },
    /// The operator left the picker without choosing.
    #[error("No file selected.")]
    Cancelled,
}

/// What a selector points at before any interaction.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Exactly one file.
    Single(&'a TerragruntFile),
    /// A stack with several files; the operator must choose.
    Ambiguous(&'a [TerragruntFile]),
}

/// Resolves a selector: an existing file path, or `project/region/stack`.
pub fn resolve<'a>(workspace: &'a Workspace, selector: &str) -> Result<Resolution<'a>, SelectorError> {
    let selector = selector.trim();
    let as_path = Path::new(selector);

    if as_path.is_file() {
        return workspace
            .find_by_path(as_path)
            .map(Resolution::Single)
            .ok_or_else(|| SelectorError::NotIndexed {
                path: selector.to_string(),
            });
    }

    let coordinate = Coordinate::parse(selector).ok_or_else(|| SelectorError::Invalid {
        selector: selector.to_string(),
    })?;

    match workspace.files_in(&coordinate) {
        [] => Err(SelectorError::UnknownStack {
            coordinate: coordinate.to_string(),
        }),
        [single] => Ok(Resolution::Single(single)),
        many => Ok(Resolution::Ambiguous(many)),
    }
}

/// Resolves a selector, asking the operator to pick a file when a stack holds several.
pub fn resolve_selector<'a>(workspace: &'a Workspace, selector: &str) -> Result<&'a TerragruntFile> {
    match resolve(workspace, selector)? {
        Resolution::Single(file) => Ok(file),
        Resolution::Ambiguous(files) => {
            let refs: Vec<&TerragruntFile> = files.iter().collect();
            choose_file(&refs, t!("select.prompt.file_in_stack"))?
                .ok_or_else(|| SelectorError::Cancelled.into())
        }
    }
}

/// Interactive file picker. Returns `None` when the operator backs out with Esc.
pub fn choose_file<'a>(
    files: &[&'a TerragruntFile],
    prompt: &str,
) -> Result<Option<&'a TerragruntFile>> {
    let items: Vec<String> = files.iter().map(|f| FileItem::new(f).label()).collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(selection.and_then(|idx| files.get(idx).copied()))
}
