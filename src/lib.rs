//! testmap - decides what to test first in a C++ codebase.
//!
//! The pipeline reads build descriptions and headers as plain text, extracts
//! a project record and function signatures, classifies each function by
//! responsibility and test priority, aggregates namespace-keyed modules with
//! their dependency graph, and emits a canonical report.

pub mod analysis;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod io;
pub mod patterns;
pub mod report;

pub use crate::analysis::{run_analysis, AnalysisInput};
pub use crate::core::{
    Classification, ClassifiedFunction, FunctionSignature, Module, NamespacePath, Project,
    Responsibility, TestPriority,
};
pub use crate::errors::{Result, TestmapError};
pub use crate::report::AnalysisReport;
