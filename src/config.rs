//! Optional `testmap.toml` configuration.
//!
//! Everything has a default; a missing file is not an error. A present but
//! unparseable file is, since silently ignoring explicit configuration
//! would be worse than stopping.

use crate::errors::{Result, TestmapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "testmap.toml";

fn default_header_extensions() -> Vec<String> {
    ["h", "hpp", "hh", "hxx"].map(String::from).to_vec()
}

fn default_source_extensions() -> Vec<String> {
    ["cpp", "cc", "cxx"].map(String::from).to_vec()
}

fn default_build_file_names() -> Vec<String> {
    vec!["CMakeLists.txt".to_string(), "*.cmake".to_string()]
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TestmapConfig {
    /// Glob patterns excluded from scanning, e.g. `third_party/**`.
    pub ignore: Vec<String>,
    /// Extensions treated as headers.
    pub header_extensions: Vec<String>,
    /// Extensions treated as translation units.
    pub source_extensions: Vec<String>,
    /// File names (or globs) treated as build-description files.
    pub build_file_names: Vec<String>,
    /// Dependency manifest relative to the project root, if any.
    pub manifest: Option<PathBuf>,
}

impl Default for TestmapConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            header_extensions: default_header_extensions(),
            source_extensions: default_source_extensions(),
            build_file_names: default_build_file_names(),
            manifest: None,
        }
    }
}

impl TestmapConfig {
    /// Load `testmap.toml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| TestmapError::FileSystem {
            message: "cannot read config".to_string(),
            path: path.clone(),
            source: Some(e),
        })?;
        toml::from_str(&text)
            .map_err(|e| TestmapError::config(format!("{}: {e}", path.display())))
    }

    pub fn is_header(&self, path: &Path) -> bool {
        has_extension(path, &self.header_extensions)
    }

    pub fn is_source(&self, path: &Path) -> bool {
        has_extension(path, &self.source_extensions)
    }

    pub fn is_build_file(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.build_file_names.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(file_name))
                .unwrap_or(false)
        })
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|known| known == e))
        .unwrap_or(false)
}
