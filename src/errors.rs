//! Shared error types for the application.
//!
//! Analysis itself degrades gracefully: malformed inputs, ambiguous matches,
//! and duplicate declarations become report warnings, never errors. The
//! variants here cover the outer surface only (unreadable paths, bad
//! configuration, bad manifests, output failures).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestmapError {
    /// File system related errors
    #[error("File system error: {message} ({})", path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Dependency manifest errors
    #[error("Manifest error in {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Output writing errors
    #[error("Output error: {0}")]
    Output(String),

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TestmapError {
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TestmapError>;
