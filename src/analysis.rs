//! End-to-end analysis pipeline.
//!
//! Files are scanned independently (in parallel by default, one task per
//! file) and the immutable per-file results are merged in input order, so
//! the report never depends on thread scheduling. Everything downstream of
//! the scan is sequential and pure.

use crate::classify::classify_all;
use crate::core::DependencyEntry;
use crate::extract::{build_config, headers, FileScan};
use crate::graph::{build_graph, build_modules};
use crate::report::{build_report, AnalysisReport};
use rayon::prelude::*;
use std::path::PathBuf;

/// Everything the pipeline consumes, already read from disk. Keeping I/O out
/// of the pipeline makes the whole run a pure function of its input.
#[derive(Clone, Debug, Default)]
pub struct AnalysisInput {
    /// Build-description files (path, contents), e.g. CMakeLists.txt.
    pub build_files: Vec<(PathBuf, String)>,
    /// Header and source files to scan (path, contents).
    pub sources: Vec<(PathBuf, String)>,
    /// Optional dependency manifest entries.
    pub manifest: Option<Vec<DependencyEntry>>,
    /// Name to use when no project declaration is found.
    pub fallback_name: String,
    pub parallel: bool,
}

/// Run the full pipeline: extract the project, scan every file, classify,
/// aggregate modules, derive the graph, and assemble the canonical report.
pub fn run_analysis(input: &AnalysisInput) -> AnalysisReport {
    let extraction = build_config::extract_project(
        &input.build_files,
        input.manifest.as_deref(),
        &input.fallback_name,
    );

    let scans: Vec<FileScan> = if input.parallel {
        input
            .sources
            .par_iter()
            .map(|(path, text)| headers::scan_file(path, text))
            .collect()
    } else {
        input
            .sources
            .iter()
            .map(|(path, text)| headers::scan_file(path, text))
            .collect()
    };

    let mut warnings = extraction.warnings;
    let mut signatures = Vec::new();
    for scan in &scans {
        warnings.extend(scan.warnings.iter().cloned());
        signatures.extend(scan.functions.iter().cloned());
    }

    let functions = classify_all(signatures);
    let modules = build_modules(&extraction.project, &scans);
    let graph = build_graph(&modules, &scans);
    let cycles = graph.find_cycles();

    log::debug!(
        "analysis: {} files, {} functions, {} modules, {} edges, {} cycles",
        input.sources.len(),
        functions.len(),
        modules.len(),
        graph.edges().len(),
        cycles.len()
    );

    build_report(
        &extraction.project,
        &modules,
        &functions,
        graph.edges(),
        &cycles,
        &warnings,
    )
}
