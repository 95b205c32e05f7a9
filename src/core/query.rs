// src/core/query.rs

use crate::{
    constants::ALL_SELECTOR,
    models::{Coordinate, TerragruntFile, Workspace},
};
use std::collections::BTreeSet;
use std::path::Path;

/// Matches one level of the hierarchy: everything, or exactly one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// No filtering on this level.
    #[default]
    All,
    /// Only the given name, compared exactly.
    Exact(String),
}

impl Selector {
    /// Parses a user value, treating the `All` sentinel (and an empty value) as [`Selector::All`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_SELECTOR {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    /// Checks a structured id against the selector.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(name) => name == id,
        }
    }
}

/// Filter over the files of a workspace. Every level defaults to [`Selector::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Project filter.
    pub project: Selector,
    /// Region filter.
    pub region: Selector,
    /// Stack filter.
    pub stack: Selector,
}

impl FilterCriteria {
    /// Region-only criteria; `"All"` yields the unfiltered criteria.
    pub fn region(value: &str) -> Self {
        Self {
            region: Selector::parse(value),
            ..Default::default()
        }
    }

    /// Checks a file's coordinate against every selector.
    pub fn matches(&self, file: &TerragruntFile) -> bool {
        self.project.matches(file.project_id())
            && self.region.matches(file.region_id())
            && self.stack.matches(file.stack_id())
    }
}

impl Workspace {
    /// Iterates over every file, in no particular order.
    pub fn files(&self) -> impl Iterator<Item = &TerragruntFile> {
        self.projects
            .values()
            .flat_map(|project| project.regions.values())
            .flat_map(|region| region.stacks.values())
            .flat_map(|stack| stack.files.iter())
    }

    /// Total number of indexed files.
    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Distinct project names, sorted ascending.
    pub fn project_names(&self) -> Vec<String> {
        sorted(self.projects.keys())
    }

    /// Distinct region names across all projects, sorted ascending.
    pub fn region_names(&self) -> Vec<String> {
        sorted(
            self.projects
                .values()
                .flat_map(|project| project.regions.keys()),
        )
    }

    /// Distinct stack names across all projects and regions, sorted ascending.
    pub fn stack_names(&self) -> Vec<String> {
        sorted(
            self.projects
                .values()
                .flat_map(|project| project.regions.values())
                .flat_map(|region| region.stacks.keys()),
        )
    }

    /// Files matching `criteria`, ordered by project, region, stack, then path.
    pub fn filter_files(&self, criteria: &FilterCriteria) -> Vec<&TerragruntFile> {
        let mut files: Vec<_> = self.files().filter(|f| criteria.matches(f)).collect();
        files.sort_by(|a, b| {
            a.coordinate()
                .cmp(b.coordinate())
                .then_with(|| a.path().cmp(b.path()))
        });
        files
    }

    /// The files of one stack, in insertion order. Empty when the stack does not exist.
    pub fn files_in(&self, coordinate: &Coordinate) -> &[TerragruntFile] {
        self.projects
            .get(&coordinate.project)
            .and_then(|project| project.regions.get(&coordinate.region))
            .and_then(|region| region.stacks.get(&coordinate.stack))
            .map(|stack| stack.files.as_slice())
            .unwrap_or_default()
    }

    /// Looks a file up by its path, comparing canonical forms when possible.
    pub fn find_by_path(&self, path: &Path) -> Option<&TerragruntFile> {
        let wanted = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.files().find(|file| {
            file.path() == path
                || dunce::canonicalize(file.path())
                    .map(|candidate| candidate == wanted)
                    .unwrap_or(false)
        })
    }
}

fn sorted<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    names
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}
