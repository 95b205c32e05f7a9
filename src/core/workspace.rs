// src/core/workspace.rs

//! # Hierarchy Index
//!
//! Builds a [`Workspace`] from a directory tree. Every candidate path found by the
//! scanner goes through the classifier and, if it fits the convention and its content
//! can be read, is appended to the stack named by its coordinate.
//!
//! Only a failing scan is fatal. A path that does not fit the convention, or a file that
//! cannot be read, is logged, recorded in the [`BuildReport`] and left out of the index.

use crate::{
    core::{
        classifier::{self, Unrecognized},
        config::ScanConfig,
        scanner::{self, ScanError},
    },
    models::{Coordinate, Project, Region, Stack, TerragruntFile, Workspace},
};
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// Why a candidate file was left out of the index.
#[derive(Error, Debug)]
pub enum SkipReason {
    /// The path does not follow `<anchor>/<project>/<region>/<stack>`.
    #[error("malformed path: {0}")]
    MalformedPath(#[from] Unrecognized),
    /// The file could not be read as text.
    #[error("unreadable file: {0}")]
    FileRead(#[from] io::Error),
}

/// Result of feeding one path to the index.
#[derive(Debug)]
pub enum AddOutcome {
    /// The file was appended under this coordinate.
    Indexed(Coordinate),
    /// The file was skipped.
    Skipped(SkipReason),
}

/// A skipped candidate and the reason it was skipped.
#[derive(Debug)]
pub struct SkippedFile {
    /// The candidate path.
    pub path: PathBuf,
    /// Why it was not indexed.
    pub reason: SkipReason,
}

/// Summary of one build, for diagnostics.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of paths returned by the scanner.
    pub candidates: usize,
    /// Number of files added to the index.
    pub indexed: usize,
    /// Every candidate that was left out.
    pub skipped: Vec<SkippedFile>,
}

impl Workspace {
    /// Scans `root` and indexes every recognized file.
    ///
    /// # Errors
    /// Returns a [`ScanError`] if the root is missing or unreadable, or if the walk fails.
    pub fn build(root: &Path, options: &ScanConfig) -> Result<Self, ScanError> {
        Self::build_with_report(root, options).map(|(workspace, _)| workspace)
    }

    /// Same as [`Workspace::build`], also returning what was indexed and what was skipped.
    pub fn build_with_report(
        root: &Path,
        options: &ScanConfig,
    ) -> Result<(Self, BuildReport), ScanError> {
        let candidates = scanner::scan(root, &options.suffix)?;

        let mut workspace = Self::new();
        let mut report = BuildReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        for path in candidates {
            match workspace.add_file(&path, &options.anchor) {
                AddOutcome::Indexed(_) => report.indexed += 1,
                AddOutcome::Skipped(reason) => report.skipped.push(SkippedFile { path, reason }),
            }
        }

        log::debug!(
            "Indexed {} of {} candidate(s) under '{}' ({} skipped)",
            report.indexed,
            report.candidates,
            root.display(),
            report.skipped.len()
        );
        Ok((workspace, report))
    }

    /// Classifies `path`, reads it, and appends it under its coordinate.
    ///
    /// Best-effort: failures are logged and reported through [`AddOutcome::Skipped`],
    /// leaving the hierarchy untouched.
    pub fn add_file(&mut self, path: &Path, anchor: &str) -> AddOutcome {
        let coordinate = match classifier::classify(path, anchor) {
            Ok(coordinate) => coordinate,
            Err(e) => {
                log::warn!("Skipping malformed path '{}': {}", path.display(), e);
                return AddOutcome::Skipped(e.into());
            }
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping unreadable file '{}': {}", path.display(), e);
                return AddOutcome::Skipped(e.into());
            }
        };

        self.insert_file(path.to_path_buf(), content, coordinate.clone());
        AddOutcome::Indexed(coordinate)
    }

    /// Appends a file under `coordinate`, creating the intermediate nodes as needed.
    /// The same coordinate value names the nodes and is stored in the file.
    pub(crate) fn insert_file(&mut self, path: PathBuf, content: String, coordinate: Coordinate) {
        let stack = self
            .get_or_create_project(&coordinate.project)
            .get_or_create_region(&coordinate.region)
            .get_or_create_stack(&coordinate.stack);
        stack.files.push(TerragruntFile {
            path,
            content,
            coordinate,
        });
    }

    /// Returns the project named `name`, creating an empty one if it does not exist.
    pub fn get_or_create_project(&mut self, name: &str) -> &mut Project {
        match self.projects.entry(name.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                log::trace!("Creating project '{}'", name);
                e.insert(Project {
                    name: name.to_string(),
                    ..Default::default()
                })
            }
        }
    }
}

impl Project {
    /// Returns the region named `name`, creating an empty one if it does not exist.
    pub fn get_or_create_region(&mut self, name: &str) -> &mut Region {
        self.regions
            .entry(name.to_string())
            .or_insert_with(|| Region {
                name: name.to_string(),
                ..Default::default()
            })
    }
}

impl Region {
    /// Returns the stack named `name`, creating an empty one if it does not exist.
    pub fn get_or_create_stack(&mut self, name: &str) -> &mut Stack {
        self.stacks
            .entry(name.to_string())
            .or_insert_with(|| Stack {
                name: name.to_string(),
                ..Default::default()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn stack<'a>(workspace: &'a Workspace, coordinate: &Coordinate) -> &'a Stack {
        &workspace.projects()[&coordinate.project].regions()[&coordinate.region].stacks()
            [&coordinate.stack]
    }

    // --- get-or-create, one level at a time ---

    #[test]
    fn test_get_or_create_project_is_idempotent() {
        let mut workspace = Workspace::new();
        workspace.get_or_create_project("acme").get_or_create_region("us-east-2");
        let again = workspace.get_or_create_project("acme");

        assert_eq!(again.name(), "acme");
        assert!(again.regions().contains_key("us-east-2"));
        assert_eq!(workspace.projects().len(), 1);
    }

    #[test]
    fn test_get_or_create_region_is_idempotent() {
        let mut project = Project::default();
        project.get_or_create_region("us-east-2").get_or_create_stack("vpc");
        let again = project.get_or_create_region("us-east-2");

        assert_eq!(again.name(), "us-east-2");
        assert!(again.stacks().contains_key("vpc"));
        assert_eq!(project.regions().len(), 1);
    }

    #[test]
    fn test_get_or_create_stack_is_idempotent() {
        let mut region = Region::default();
        region.get_or_create_stack("vpc");
        let again = region.get_or_create_stack("vpc");

        assert_eq!(again.name(), "vpc");
        assert!(again.files().is_empty());
        assert_eq!(region.stacks().len(), 1);
    }

    #[test]
    fn test_same_coordinate_appends_to_existing_stack() {
        let mut workspace = Workspace::new();
        let coordinate = Coordinate::new("acme", "us-east-2", "vpc");
        workspace.insert_file("a/terragrunt.hcl".into(), "a".into(), coordinate.clone());
        workspace.insert_file("b/terragrunt.hcl".into(), "b".into(), coordinate.clone());

        assert_eq!(workspace.projects().len(), 1);
        let project = &workspace.projects()["acme"];
        assert_eq!(project.regions().len(), 1);
        assert_eq!(project.regions()["us-east-2"].stacks().len(), 1);

        let files = stack(&workspace, &coordinate).files();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.coordinate() == &coordinate));
    }

    // --- add_file ---

    #[test]
    fn test_add_file_records_content_and_coordinate() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "workspaces/acme/us-east-2/vpc/terragrunt.hcl",
            "include {}\n",
        );
        let mut workspace = Workspace::new();

        let outcome = workspace.add_file(&path, "workspaces");

        let coordinate = Coordinate::new("acme", "us-east-2", "vpc");
        assert!(matches!(outcome, AddOutcome::Indexed(ref c) if *c == coordinate));
        let file = &stack(&workspace, &coordinate).files()[0];
        assert_eq!(file.path(), path);
        assert_eq!(file.content(), "include {}\n");
        assert_eq!(file.project_id(), "acme");
        assert_eq!(file.region_id(), "us-east-2");
        assert_eq!(file.stack_id(), "vpc");
    }

    #[test]
    fn test_add_file_skips_malformed_path_without_creating_nodes() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "workspaces/acme/terragrunt.hcl", "");
        let mut workspace = Workspace::new();

        let outcome = workspace.add_file(&path, "workspaces");

        assert!(matches!(
            outcome,
            AddOutcome::Skipped(SkipReason::MalformedPath(Unrecognized::TooShallow { .. }))
        ));
        assert!(workspace.is_empty());
    }

    #[test]
    fn test_add_file_skips_unreadable_file_without_creating_nodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workspaces/acme/us-east-2/vpc/terragrunt.hcl");
        let mut workspace = Workspace::new();

        let outcome = workspace.add_file(&path, "workspaces");

        assert!(matches!(outcome, AddOutcome::Skipped(SkipReason::FileRead(_))));
        assert!(workspace.is_empty());
    }

    // --- build scenarios ---

    #[test]
    fn test_build_two_stacks_in_one_region() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "workspaces/acme/us-east-2/vpc/terragrunt.hcl", "vpc");
        write(dir.path(), "workspaces/acme/us-east-2/alb/terragrunt.hcl", "alb");

        let (workspace, report) =
            Workspace::build_with_report(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(report.candidates, 2);
        assert_eq!(report.indexed, 2);
        assert!(report.skipped.is_empty());

        assert_eq!(workspace.projects().len(), 1);
        let regions = workspace.projects()["acme"].regions();
        assert_eq!(regions.len(), 1);
        let stacks = regions["us-east-2"].stacks();
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks["vpc"].files().len(), 1);
        assert_eq!(stacks["alb"].files().len(), 1);
        assert_eq!(stacks["alb"].files()[0].content(), "alb");
    }

    #[test]
    fn test_build_without_matches_is_empty() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "notes/readme.txt", "hello");

        let workspace = Workspace::build(dir.path(), &ScanConfig::default()).unwrap();

        assert!(workspace.is_empty());
    }

    #[test]
    fn test_build_reports_malformed_candidates() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "modules/vpc/terragrunt.hcl", "");
        write(dir.path(), "workspaces/acme/us-east-2/vpc/terragrunt.hcl", "");

        let (workspace, report) =
            Workspace::build_with_report(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(report.indexed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path.ends_with("modules/vpc/terragrunt.hcl"));
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::MalformedPath(Unrecognized::MissingAnchor { .. })
        ));
        assert_eq!(workspace.projects().len(), 1);
    }

    #[test]
    fn test_build_missing_root_fails() {
        let dir = TempDir::new().unwrap();

        let result = Workspace::build(&dir.path().join("missing"), &ScanConfig::default());

        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[test]
    fn test_build_skips_unreadable_file_but_keeps_siblings() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "workspaces/acme/us-east-2/vpc/subnets/terragrunt.hcl",
            "subnets",
        );
        // Not valid UTF-8, so it cannot be read as text.
        let broken = dir
            .path()
            .join("workspaces/acme/us-east-2/vpc/endpoints/terragrunt.hcl");
        fs::create_dir_all(broken.parent().unwrap()).unwrap();
        fs::write(&broken, [0xff, 0xfe, 0xfd]).unwrap();

        let (workspace, report) =
            Workspace::build_with_report(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(report.indexed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::FileRead(_)));
        let files = stack(&workspace, &Coordinate::new("acme", "us-east-2", "vpc")).files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content(), "subnets");
    }

    #[cfg(unix)]
    #[test]
    fn test_build_skips_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "workspaces/acme/us-east-2/vpc/a/terragrunt.hcl", "a");
        let link = dir.path().join("workspaces/acme/us-east-2/vpc/b/terragrunt.hcl");
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.hcl"), &link).unwrap();

        let (workspace, report) =
            Workspace::build_with_report(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(report.indexed, 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::FileRead(_)));
        assert_eq!(
            stack(&workspace, &Coordinate::new("acme", "us-east-2", "vpc"))
                .files()
                .len(),
            1
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_build_skips_permission_denied_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "workspaces/acme/us-east-2/vpc/a/terragrunt.hcl", "a");
        let locked = write(dir.path(), "workspaces/acme/us-east-2/vpc/b/terragrunt.hcl", "b");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_to_string(&locked).is_ok() {
            // Root ignores file modes.
            return;
        }

        let (workspace, report) =
            Workspace::build_with_report(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(report.candidates, 2);
        assert_eq!(report.indexed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, locked);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::FileRead(ref e) if e.kind() == io::ErrorKind::PermissionDenied
        ));
        let files = stack(&workspace, &Coordinate::new("acme", "us-east-2", "vpc")).files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content(), "a");
    }

    #[test]
    fn test_build_with_custom_anchor_and_suffix() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "live/acme/us-east-1/vpc/stack.hcl", "");
        write(dir.path(), "live/acme/us-east-1/vpc/terragrunt.hcl", "");
        let options = ScanConfig {
            anchor: "live".to_string(),
            suffix: "stack.hcl".to_string(),
        };

        let (workspace, report) = Workspace::build_with_report(dir.path(), &options).unwrap();

        assert_eq!(report.candidates, 1);
        assert!(workspace.projects()["acme"].regions()["us-east-1"]
            .stacks()
            .contains_key("vpc"));
    }
}
