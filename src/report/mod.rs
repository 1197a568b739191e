//! Canonical report assembly.
//!
//! The report is the single output contract: a fully-ordered JSON document
//! whose field and element order never depends on traversal or thread
//! scheduling. Building it is pure assembly over already-computed parts;
//! the only logic added here is the consistency pass that patches edges
//! pointing at modules missing from the module list.

use crate::core::{
    ClassifiedFunction, DependencyEdge, Module, NamespacePath, Project, Responsibility,
    TestPriority,
};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cpp_standard: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleEntry {
    /// Dotted module name, e.g. `simple.protocol`.
    pub name: String,
    /// C++ namespace form, e.g. `simple::protocol`.
    pub namespace: String,
    pub headers: Vec<String>,
    /// External dependency names referenced by this module's files.
    pub dependencies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct KeyFunctionEntry {
    /// Fully qualified function name.
    pub name: String,
    pub file: String,
    pub line: usize,
    pub signature: String,
    pub priority: TestPriority,
    pub category: Responsibility,
}

#[derive(Clone, Debug, Serialize)]
pub struct EdgeEntry {
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// The complete analysis report in canonical order.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub project: ProjectSummary,
    pub modules: Vec<ModuleEntry>,
    pub key_functions: Vec<KeyFunctionEntry>,
    pub dependency_edges: Vec<EdgeEntry>,
    pub cycles: Vec<Vec<String>>,
    pub warnings: Vec<String>,
}

/// Assemble the canonical report. Modules sort by namespace path, functions
/// by (priority, category, qualified name), edges by (from, to, reason),
/// cycles by their normalized member sequence. Edges or function namespaces
/// that reference a module missing from the module list get a placeholder
/// module and a warning instead of being dropped.
pub fn build_report(
    project: &Project,
    modules: &[Module],
    functions: &[ClassifiedFunction],
    edges: &[DependencyEdge],
    cycles: &[Vec<NamespacePath>],
    warnings: &[String],
) -> AnalysisReport {
    let mut warnings = warnings.to_vec();
    let mut modules = modules.to_vec();
    patch_missing_modules(&mut modules, functions, edges, &mut warnings);
    modules.sort_by(|a, b| a.path.cmp(&b.path));

    let module_entries = modules
        .iter()
        .map(|m| ModuleEntry {
            name: m.path.dotted(),
            namespace: m.path.qualified(),
            headers: m
                .headers
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            dependencies: m.external_refs.iter().cloned().collect(),
        })
        .collect();

    let mut key_functions: Vec<KeyFunctionEntry> = functions
        .iter()
        .map(|f| KeyFunctionEntry {
            name: f.signature.qualified_name.clone(),
            file: f.signature.file.display().to_string(),
            line: f.signature.line,
            signature: f.signature.render(),
            priority: f.classification.priority,
            category: f.classification.responsibility,
        })
        .collect();
    key_functions.sort_by(|a, b| {
        (a.priority, a.category.to_string(), &a.name).cmp(&(
            b.priority,
            b.category.to_string(),
            &b.name,
        ))
    });

    let mut sorted_edges = edges.to_vec();
    sorted_edges.sort();
    let dependency_edges = sorted_edges
        .iter()
        .map(|e| EdgeEntry {
            from: e.from.dotted(),
            to: e.to.dotted(),
            reason: e.reason.to_string(),
        })
        .collect();

    let mut cycle_entries: Vec<Vec<String>> = cycles
        .iter()
        .map(|cycle| cycle.iter().map(|p| p.dotted()).collect())
        .collect();
    cycle_entries.sort();

    AnalysisReport {
        project: ProjectSummary {
            name: project.name.clone(),
            kind: project.kind().to_string(),
            cpp_standard: project.cpp_standard.clone(),
        },
        modules: module_entries,
        key_functions,
        dependency_edges,
        cycles: cycle_entries,
        warnings,
    }
}

/// A function namespace or edge endpoint that names no known module means
/// the scan and the aggregation disagree. Patch in an empty placeholder
/// module and say so, rather than emitting a dangling reference. Functions
/// in the global namespace land here too: no namespace is ever opened for
/// them, so `root` gets a placeholder.
fn patch_missing_modules(
    modules: &mut Vec<Module>,
    functions: &[ClassifiedFunction],
    edges: &[DependencyEdge],
    warnings: &mut Vec<String>,
) {
    let known: BTreeSet<NamespacePath> = modules.iter().map(|m| m.path.clone()).collect();
    let mut missing: BTreeSet<NamespacePath> = BTreeSet::new();
    for function in functions {
        if !known.contains(&function.signature.namespace) {
            missing.insert(function.signature.namespace.clone());
        }
    }
    for edge in edges {
        for endpoint in [&edge.from, &edge.to] {
            if !known.contains(endpoint) {
                missing.insert(endpoint.clone());
            }
        }
    }
    for path in missing {
        warnings.push(format!(
            "inconsistent reference: module '{}' is referenced but was never scanned",
            path.dotted()
        ));
        modules.push(Module::new(path));
    }
}
