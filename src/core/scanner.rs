// src/core/scanner.rs

use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors that abort a scan. There is no partial result: any of these means no workspace.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The root directory does not exist.
    #[error("Root directory '{path}' does not exist.")]
    RootNotFound {
        /// The root as given.
        path: String,
    },
    /// The root exists but is not a directory.
    #[error("Root path '{path}' is not a directory.")]
    NotADirectory {
        /// The root as given.
        path: String,
    },
    /// The root's metadata could not be read.
    #[error("Could not access root directory '{path}': {source}")]
    RootUnreadable {
        /// The root as given.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// An I/O error occurred somewhere during the walk.
    #[error("Filesystem walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Recursively collects every file under `root` whose name ends with `suffix`.
///
/// Directories whose name starts with `.` are pruned (the root itself is always walked).
/// Entries are visited in file-name order, so the result is stable for a given tree.
pub fn scan(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, ScanError> {
    ensure_root_dir(root)?;
    debug!("Scanning '{}' for '*{}' files", root.display(), suffix);

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden_dir(entry));

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            log::trace!("Candidate: {}", entry.path().display());
            candidates.push(entry.into_path());
        }
    }

    debug!("Scan of '{}' found {} candidate(s)", root.display(), candidates.len());
    Ok(candidates)
}

fn ensure_root_dir(root: &Path) -> Result<(), ScanError> {
    let path = root.display().to_string();
    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory { path }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ScanError::RootNotFound { path }),
        Err(source) => Err(ScanError::RootUnreadable { path, source }),
    }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RECOGNIZED_SUFFIX;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "terraform {}\n").unwrap();
        path
    }

    fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_collects_matching_files_recursively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "workspaces/acme/us-east-2/vpc/terragrunt.hcl");
        touch(dir.path(), "workspaces/acme/us-east-2/alb/terragrunt.hcl");
        touch(dir.path(), "workspaces/acme/us-east-2/alb/main.tf");
        touch(dir.path(), "notes/readme.txt");

        let found = scan(dir.path(), RECOGNIZED_SUFFIX).unwrap();

        assert_eq!(
            relative(dir.path(), &found),
            vec![
                "workspaces/acme/us-east-2/alb/terragrunt.hcl",
                "workspaces/acme/us-east-2/vpc/terragrunt.hcl",
            ]
        );
    }

    #[test]
    fn test_scan_prunes_hidden_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "workspaces/acme/us-east-2/vpc/terragrunt.hcl");
        touch(dir.path(), "workspaces/acme/us-east-2/vpc/.terragrunt-cache/x/terragrunt.hcl");
        touch(dir.path(), ".git/workspaces/acme/us-east-2/vpc/terragrunt.hcl");

        let found = scan(dir.path(), RECOGNIZED_SUFFIX).unwrap();

        assert_eq!(
            relative(dir.path(), &found),
            vec!["workspaces/acme/us-east-2/vpc/terragrunt.hcl"]
        );
    }

    #[test]
    fn test_scan_matches_by_suffix_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "workspaces/acme/us-east-2/vpc/root-terragrunt.hcl");
        touch(dir.path(), "workspaces/acme/us-east-2/vpc/terragrunt.hcl.bak");

        let found = scan(dir.path(), RECOGNIZED_SUFFIX).unwrap();

        assert_eq!(
            relative(dir.path(), &found),
            vec!["workspaces/acme/us-east-2/vpc/root-terragrunt.hcl"]
        );
    }

    #[test]
    fn test_scan_walks_a_hidden_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(".infra");
        touch(&root, "workspaces/acme/us-east-2/vpc/terragrunt.hcl");

        let found = scan(&root, RECOGNIZED_SUFFIX).unwrap();

        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = scan(&missing, RECOGNIZED_SUFFIX);

        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[test]
    fn test_scan_root_is_a_file() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "terragrunt.hcl");

        let result = scan(&file, RECOGNIZED_SUFFIX);

        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }

    #[test]
    fn test_scan_empty_root() {
        let dir = TempDir::new().unwrap();
        assert!(scan(dir.path(), RECOGNIZED_SUFFIX).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_unreadable_subdirectory_aborts() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "workspaces/acme/us-east-2/vpc/terragrunt.hcl");
        touch(dir.path(), "workspaces/acme/us-east-2/locked/terragrunt.hcl");
        let locked = dir.path().join("workspaces/acme/us-east-2/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Root ignores directory modes.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = scan(dir.path(), RECOGNIZED_SUFFIX);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }
}
