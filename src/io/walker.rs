//! Project tree discovery.

use crate::config::TestmapConfig;
use crate::errors::{Result, TestmapError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Files discovered under a project root, split by role.
#[derive(Clone, Debug, Default)]
pub struct ProjectFiles {
    pub build_files: Vec<PathBuf>,
    pub sources: Vec<PathBuf>,
}

pub struct FileWalker<'a> {
    root: PathBuf,
    config: &'a TestmapConfig,
}

impl<'a> FileWalker<'a> {
    pub fn new(root: &Path, config: &'a TestmapConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// Walk the tree, honoring `.gitignore` plus the config's ignore globs,
    /// and bucket each file as a build description, a scannable source, or
    /// neither. Results are sorted so downstream output is stable.
    pub fn walk(&self) -> Result<ProjectFiles> {
        let mut found = ProjectFiles::default();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| TestmapError::External(e.into()))?;
            let path = entry.path();
            if !path.is_file() || self.is_ignored(path) {
                continue;
            }
            if self.config.is_build_file(path) {
                found.build_files.push(path.to_path_buf());
            } else if self.config.is_header(path) || self.config.is_source(path) {
                found.sources.push(path.to_path_buf());
            }
        }

        found.build_files.sort();
        found.sources.sort();
        Ok(found)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel_str = rel.to_string_lossy();
        self.config.ignore.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&rel_str))
                .unwrap_or(false)
        })
    }
}

/// Read each file into memory, turning unreadable files into warnings
/// instead of aborting the whole run.
pub fn read_files(paths: &[PathBuf]) -> (Vec<(PathBuf, String)>, Vec<String>) {
    let mut contents = Vec::with_capacity(paths.len());
    let mut warnings = Vec::new();
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(text) => contents.push((path.clone(), text)),
            Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
        }
    }
    (contents, warnings)
}
