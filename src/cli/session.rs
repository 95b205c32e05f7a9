// src/cli/session.rs

// Presentation state of an interactive session. Nothing here is persisted.

use crate::{
    constants::NO_EXECUTION_PLACEHOLDER,
    models::TerragruntFile,
    system::executor::{ExecutionError, ExecutionReport},
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The last execution output of each file run during this session, keyed by path.
#[derive(Debug, Default)]
pub struct ExecutionLog {
    entries: HashMap<PathBuf, String>,
}

impl ExecutionLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the text shown for the last execution of `path`, replacing any previous one.
    pub fn record(&mut self, path: &Path, text: impl Into<String>) {
        self.entries.insert(path.to_path_buf(), text.into());
    }

    /// Stores an execution result. Failures keep whatever output the command produced.
    pub fn record_result(
        &mut self,
        path: &Path,
        result: &Result<ExecutionReport, ExecutionError>,
    ) {
        self.record(path, describe_result(result));
    }

    /// The last recorded output, or the placeholder when the file never ran.
    pub fn last_output(&self, path: &Path) -> &str {
        self.entries
            .get(path)
            .map(String::as_str)
            .unwrap_or(NO_EXECUTION_PLACEHOLDER)
    }
}

/// Text for an execution result, as shown to the operator.
pub fn describe_result(result: &Result<ExecutionReport, ExecutionError>) -> String {
    match result {
        Ok(report) => report.output.clone(),
        Err(e) => match e.captured_output() {
            Some(output) if !output.is_empty() => format!("{}\n\n# {}", output.trim_end(), e),
            _ => format!("# {}", e),
        },
    }
}

/// A file as it appears in the browse list.
#[derive(Debug, Clone, Copy)]
pub struct FileItem<'a> {
    file: &'a TerragruntFile,
}

impl<'a> FileItem<'a> {
    /// Wraps `file` for display.
    pub fn new(file: &'a TerragruntFile) -> Self {
        Self { file }
    }

    /// The wrapped file.
    pub fn file(&self) -> &'a TerragruntFile {
        self.file
    }

    /// The stack name.
    pub fn title(&self) -> &'a str {
        self.file.stack_id()
    }

    /// Project and region, shown next to the title.
    pub fn description(&self) -> String {
        format!(
            "Project: {}, Region: {}",
            self.file.project_id(),
            self.file.region_id()
        )
    }

    /// The line used by list selectors.
    pub fn label(&self) -> String {
        format!(
            "{} [{}] ({})",
            self.title(),
            self.file.resource_name(),
            self.description()
        )
    }

    /// File content under a header with its path, fenced as Terraform.
    pub fn rendered_content(&self) -> String {
        let content = self.file.content();
        let separator = if content.is_empty() || content.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        format!(
            "# `{}`\n\n```terraform\n{}{}```\n",
            self.file.path().display(),
            content,
            separator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Workspace};

    fn workspace_with(content: &str) -> Workspace {
        let mut workspace = Workspace::new();
        workspace.insert_file(
            "/w/workspaces/acme/us-east-2/vpc/terragrunt.hcl".into(),
            content.to_string(),
            Coordinate::new("acme", "us-east-2", "vpc"),
        );
        workspace
    }

    #[test]
    fn test_file_item_presentation() {
        let workspace = workspace_with("terraform {\n  source = \"../modules/vpc\"\n}");
        let file = workspace.files().next().unwrap();
        let item = FileItem::new(file);

        assert_eq!(item.title(), "vpc");
        assert_eq!(item.description(), "Project: acme, Region: us-east-2");
        assert_eq!(
            item.rendered_content(),
            "# `/w/workspaces/acme/us-east-2/vpc/terragrunt.hcl`\n\n```terraform\nterraform {\n  source = \"../modules/vpc\"\n}\n```\n"
        );
    }

    #[test]
    fn test_execution_log_defaults_to_placeholder() {
        let mut log = ExecutionLog::new();
        let path = Path::new("/w/workspaces/acme/us-east-2/vpc/terragrunt.hcl");
        assert_eq!(log.last_output(path), "# No execution yet");

        log.record(path, "first");
        log.record(path, "second");
        assert_eq!(log.last_output(path), "second");
        assert_eq!(log.last_output(Path::new("/other")), "# No execution yet");
    }

    #[test]
    fn test_failed_result_keeps_captured_output() {
        let result = Err(ExecutionError::NonZeroExit {
            command: "terragrunt init -reconfigure".to_string(),
            status: "exit code 1".to_string(),
            output: "Error: backend not configured\n".to_string(),
        });
        let text = describe_result(&result);
        assert!(text.starts_with("Error: backend not configured\n\n# "));
        assert!(text.contains("exit code 1"));

        let result = Err(ExecutionError::EmptyCommand);
        assert_eq!(describe_result(&result), "# No command specified to run.");
    }
}
