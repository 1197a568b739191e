//! Build-description extraction.
//!
//! Applies the pattern library's extraction rules to CMake-style text and
//! folds the matches into an immutable [`Project`]. Extraction is pure text
//! analysis: the same input always yields a byte-identical record.

use crate::core::{DependencyEntry, Project, Target, TargetKind};
use crate::extract::looks_malformed;
use crate::patterns::{extraction_rule, match_rule};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Argument keywords that never name a source file.
const TARGET_ARG_KEYWORDS: &[&str] = &[
    "PUBLIC",
    "PRIVATE",
    "INTERFACE",
    "STATIC",
    "SHARED",
    "MODULE",
    "OBJECT",
    "ALIAS",
    "WIN32",
    "MACOSX_BUNDLE",
    "EXCLUDE_FROM_ALL",
];

/// Result of build-config extraction: the project plus any non-fatal
/// diagnostics collected along the way.
#[derive(Clone, Debug, Default)]
pub struct BuildExtraction {
    pub project: Project,
    pub warnings: Vec<String>,
}

/// Extract a [`Project`] from one or more build-description files.
///
/// `fallback_name` is used when no `project(...)` declaration is found
/// (callers typically pass the root directory name). Manifest dependencies
/// are unioned with `find_package` hits, deduplicated by exact name.
pub fn extract_project(
    files: &[(PathBuf, String)],
    manifest: Option<&[DependencyEntry]>,
    fallback_name: &str,
) -> BuildExtraction {
    let mut out = BuildExtraction::default();
    let mut external_deps = BTreeSet::new();
    let mut targets: Vec<Target> = Vec::new();

    for (path, text) in files {
        if looks_malformed(text) {
            out.warnings.push(format!(
                "malformed input: {} cannot be tokenized, skipped",
                path.display()
            ));
            continue;
        }
        extract_from_text(path, text, &mut out, &mut targets, &mut external_deps);
    }

    if let Some(entries) = manifest {
        for entry in entries {
            external_deps.insert(entry.name.clone());
        }
    }

    if out.project.name.is_empty() {
        out.project.name = fallback_name.to_string();
    }
    out.project.targets = targets;
    out.project.external_deps = external_deps;
    out
}

fn extract_from_text(
    path: &Path,
    text: &str,
    out: &mut BuildExtraction,
    targets: &mut Vec<Target>,
    external_deps: &mut BTreeSet<String>,
) {
    let name_rule = extraction_rule("project-name").expect("rule table");
    if out.project.name.is_empty() {
        if let Some(caps) = match_rule(name_rule, text).into_iter().next() {
            out.project.name = caps[1].to_string();
        }
    }

    let std_rule = extraction_rule("cpp-standard").expect("rule table");
    if out.project.cpp_standard.is_empty() {
        if let Some(caps) = match_rule(std_rule, text).into_iter().next() {
            out.project.cpp_standard = caps[1].to_string();
        }
    }

    let target_rule = extraction_rule("target-declaration").expect("rule table");
    for caps in match_rule(target_rule, text) {
        let kind = match caps[1].to_lowercase().as_str() {
            "executable" => TargetKind::Executable,
            _ => TargetKind::Library,
        };
        let name = caps[2].to_string();
        let mut target = Target::new(name.clone(), kind);
        target.sources = source_list(&caps[3]);

        // Later declaration wins on duplicate names; earlier one is dropped.
        if let Some(pos) = targets.iter().position(|t| t.name == name) {
            out.warnings.push(format!(
                "duplicate target declaration '{name}' in {}; keeping the later one",
                path.display()
            ));
            targets.remove(pos);
        }
        targets.push(target);
    }

    let include_rule = extraction_rule("include-directories").expect("rule table");
    for caps in match_rule(include_rule, text) {
        let name = caps[1].to_string();
        let dirs = include_dirs(&caps[2]);
        match targets.iter_mut().find(|t| t.name == name) {
            Some(target) => target.include_dirs.extend(dirs),
            None => out.warnings.push(format!(
                "ambiguous match: include directories for unknown target '{name}' in {}, skipped",
                path.display()
            )),
        }
    }

    let package_rule = extraction_rule("find-package").expect("rule table");
    for caps in match_rule(package_rule, text) {
        external_deps.insert(caps[1].to_string());
    }
}

/// Tokens from a target declaration body that look like source files.
/// Keywords and `${...}` variable expansions are ignored; a target declared
/// with zero sources is valid.
fn source_list(args: &str) -> Vec<String> {
    args.split_whitespace()
        .filter(|tok| !TARGET_ARG_KEYWORDS.contains(tok))
        .filter(|tok| !tok.contains("${"))
        .filter(|tok| tok.contains('.'))
        .map(|tok| tok.trim_matches('"').to_string())
        .collect()
}

fn include_dirs(args: &str) -> BTreeSet<String> {
    args.split_whitespace()
        .filter(|tok| !TARGET_ARG_KEYWORDS.contains(tok))
        .filter(|tok| !tok.contains("${"))
        .map(|tok| tok.trim_matches('"').to_string())
        .collect()
}

/// Parse a JSON dependency manifest. Accepts either a bare list of
/// `{name, version?}` objects or an object with a `dependencies` list.
pub fn parse_manifest(text: &str) -> Result<Vec<DependencyEntry>, serde_json::Error> {
    #[derive(serde::Deserialize)]
    struct Wrapped {
        dependencies: Vec<DependencyEntry>,
    }

    serde_json::from_str::<Vec<DependencyEntry>>(text)
        .or_else(|_| serde_json::from_str::<Wrapped>(text).map(|w| w.dependencies))
}
