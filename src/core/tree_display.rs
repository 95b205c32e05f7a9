// src/core/tree_display.rs

use crate::models::{TerragruntFile, Workspace};
use std::collections::HashMap;
use std::fmt::Write;

/// Controls how much of the hierarchy is rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    /// Render the individual files under each stack.
    pub show_files: bool,
    /// Render full file paths instead of the resource (directory) name.
    pub show_paths: bool,
    /// Stop after this many levels (1 = projects only).
    pub max_depth: Option<usize>,
}

/// One node of the render tree. Children are sorted by label when the node is built,
/// so the output does not depend on `HashMap` order.
struct Node {
    label: String,
    children: Vec<Node>,
}

/// Renders the workspace as an ASCII tree: project → region → stack (→ files).
pub fn render_workspace_tree(workspace: &Workspace, options: &DisplayOptions) -> String {
    let roots = build_nodes(workspace, options);
    let mut out = String::new();
    for (i, node) in roots.iter().enumerate() {
        let is_last = i + 1 == roots.len();
        render_node(node, "", is_last, 1, options, &mut out);
    }
    out
}

fn build_nodes(workspace: &Workspace, options: &DisplayOptions) -> Vec<Node> {
    sorted_nodes(workspace.projects(), |name, project| {
        let regions = sorted_nodes(project.regions(), |name, region| {
            let stacks = sorted_nodes(region.stacks(), |name, stack| Node {
                label: format!("{} ({})", name, stack.files().len()),
                children: if options.show_files {
                    file_nodes(stack.files(), options)
                } else {
                    Vec::new()
                },
            });
            Node {
                label: name.to_string(),
                children: stacks,
            }
        });
        Node {
            label: name.to_string(),
            children: regions,
        }
    })
}

fn sorted_nodes<T>(map: &HashMap<String, T>, build: impl Fn(&str, &T) -> Node) -> Vec<Node> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
        .into_iter()
        .map(|(name, value)| build(name, value))
        .collect()
}

fn file_nodes(files: &[TerragruntFile], options: &DisplayOptions) -> Vec<Node> {
    let mut labels: Vec<String> = files
        .iter()
        .map(|file| {
            if options.show_paths {
                file.path().display().to_string()
            } else {
                file.resource_name()
            }
        })
        .collect();
    labels.sort();
    labels
        .into_iter()
        .map(|label| Node {
            label,
            children: Vec::new(),
        })
        .collect()
}

/// Recursive function to render a node and its descendants.
fn render_node(
    node: &Node,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &DisplayOptions,
    out: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}{} {}", prefix, connector, node.label);

    if options.max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i + 1 == node.children.len();
        render_node(child, &child_prefix, is_last_child, depth + 1, options, out);
    }
}
