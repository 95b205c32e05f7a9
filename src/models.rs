// src/models.rs

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// --- HIERARCHY MODELS ---
// Built once by `core::workspace` and read-only afterwards. Fields are crate-private so
// the only writers are the get-or-create operations of the index.

/// The (project, region, stack) triple that places a file in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Segment right after the anchor.
    pub project: String,
    /// Second segment after the anchor.
    pub region: String,
    /// Third segment after the anchor.
    pub stack: String,
}

impl Coordinate {
    /// Creates a coordinate from its three segments.
    pub fn new(
        project: impl Into<String>,
        region: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            region: region.into(),
            stack: stack.into(),
        }
    }

    /// Parses the `project/region/stack` form used by CLI selectors.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim_matches('/').split('/');
        let (project, region, stack) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || [project, region, stack].iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self::new(project, region, stack))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.region, self.stack)
    }
}

/// One `terragrunt.hcl` file with its content and the coordinate it was classified under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerragruntFile {
    pub(crate) path: PathBuf,
    pub(crate) content: String,
    pub(crate) coordinate: Coordinate,
}

impl TerragruntFile {
    /// Path of the file as produced by the scanner.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full text of the file, read at index time.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The coordinate this file lives under.
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Project id.
    pub fn project_id(&self) -> &str {
        &self.coordinate.project
    }

    /// Region id.
    pub fn region_id(&self) -> &str {
        &self.coordinate.region
    }

    /// Stack id.
    pub fn stack_id(&self) -> &str {
        &self.coordinate.stack
    }

    /// The directory holding the file, which is where Terragrunt gets executed.
    pub fn working_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Name of the directory that contains the file, or `Default` when there is none.
    /// A stack may nest several modules, so this is what tells sibling files apart.
    pub fn resource_name(&self) -> String {
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Default".to_string())
    }
}

/// A named bucket of files inside a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    pub(crate) name: String,
    pub(crate) files: Vec<TerragruntFile>,
}

impl Stack {
    /// Stack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Files in insertion order.
    pub fn files(&self) -> &[TerragruntFile] {
        &self.files
    }
}

/// A named bucket of stacks inside a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub(crate) name: String,
    pub(crate) stacks: HashMap<String, Stack>,
}

impl Region {
    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stacks keyed by name. Iteration order is unspecified.
    pub fn stacks(&self) -> &HashMap<String, Stack> {
        &self.stacks
    }
}

/// A named bucket of regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub(crate) name: String,
    pub(crate) regions: HashMap<String, Region>,
}

impl Project {
    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regions keyed by name. Iteration order is unspecified.
    pub fn regions(&self) -> &HashMap<String, Region> {
        &self.regions
    }
}

/// The root of the index: every project discovered by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    pub(crate) projects: HashMap<String, Project>,
}

impl Workspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects keyed by name. Iteration order is unspecified; use the query layer for
    /// anything that must be ordered.
    pub fn projects(&self) -> &HashMap<String, Project> {
        &self.projects
    }

    /// `true` when the scan did not index a single file.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
