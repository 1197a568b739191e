use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A C++ namespace path such as `simple::net`, kept as an ordered
/// sequence of identifiers so modules can be keyed and sorted by it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePath(pub Vec<String>);

impl NamespacePath {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_colon_str(s: &str) -> Self {
        Self(
            s.split("::")
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
                .collect(),
        )
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, part: String) {
        self.0.push(part);
    }

    /// Dotted form used as the module name in reports, e.g. `simple.protocol`.
    pub fn dotted(&self) -> String {
        if self.0.is_empty() {
            "root".to_string()
        } else {
            self.0.join(".")
        }
    }

    /// C++ form, e.g. `simple::protocol`. Empty for the global namespace.
    pub fn qualified(&self) -> String {
        self.0.join("::")
    }
}

impl std::fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Executable,
    Library,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Executable => write!(f, "executable"),
            TargetKind::Library => write!(f, "library"),
        }
    }
}

/// A single build declaration from a build-description file.
/// Source order is preserved; include directories are deduplicated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub kind: TargetKind,
    pub sources: Vec<String>,
    pub include_dirs: BTreeSet<String>,
}

impl Target {
    pub fn new(name: String, kind: TargetKind) -> Self {
        Self {
            name,
            kind,
            sources: Vec::new(),
            include_dirs: BTreeSet::new(),
        }
    }
}

/// Immutable project record produced by build-config extraction.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub cpp_standard: String,
    pub targets: Vec<Target>,
    pub external_deps: BTreeSet<String>,
}

impl Project {
    /// Project-level kind: a project is reported as a library unless any
    /// target is an executable.
    pub fn kind(&self) -> TargetKind {
        if self
            .targets
            .iter()
            .any(|t| t.kind == TargetKind::Executable)
        {
            TargetKind::Executable
        } else {
            TargetKind::Library
        }
    }
}

/// An entry from an optional dependency manifest (name plus optional version).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Aggregation unit keyed by namespace path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub path: NamespacePath,
    pub headers: BTreeSet<PathBuf>,
    pub external_refs: BTreeSet<String>,
}

impl Module {
    pub fn new(path: NamespacePath) -> Self {
        Self {
            path,
            headers: BTreeSet::new(),
            external_refs: BTreeSet::new(),
        }
    }
}

/// A function declaration recognized by the header scanner.
/// Immutable once extracted; classification derives everything else from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Base name without any qualification, e.g. `parse`.
    pub name: String,
    /// Fully qualified name including namespaces and enclosing class,
    /// e.g. `simple::protocol::Decoder::parse`.
    pub qualified_name: String,
    pub file: PathBuf,
    pub line: usize,
    pub namespace: NamespacePath,
    /// Ordered parameter type descriptors with parameter names stripped.
    pub params: Vec<String>,
    pub return_type: String,
    pub is_const: bool,
    pub is_noexcept: bool,
    pub is_virtual: bool,
    pub is_override: bool,
}

impl FunctionSignature {
    /// Render the declaration back into a single-line signature string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.is_virtual {
            out.push_str("virtual ");
        }
        out.push_str(&self.return_type);
        out.push(' ');
        out.push_str(&self.name);
        out.push('(');
        out.push_str(&self.params.join(", "));
        out.push(')');
        if self.is_const {
            out.push_str(" const");
        }
        if self.is_noexcept {
            out.push_str(" noexcept");
        }
        if self.is_override {
            out.push_str(" override");
        }
        out
    }
}

/// Functional role assigned to a function by the classifier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Responsibility {
    #[serde(rename = "parsing/encoding")]
    ParsingEncoding,
    #[serde(rename = "network-io")]
    NetworkIo,
    #[serde(rename = "state-management")]
    StateManagement,
    #[serde(rename = "callback-event")]
    CallbackEvent,
    #[serde(rename = "utility-conversion")]
    UtilityConversion,
    #[serde(rename = "lifecycle")]
    Lifecycle,
    #[serde(rename = "unclassified")]
    Unclassified,
}

impl std::fmt::Display for Responsibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Responsibility::ParsingEncoding => "parsing/encoding",
            Responsibility::NetworkIo => "network-io",
            Responsibility::StateManagement => "state-management",
            Responsibility::CallbackEvent => "callback-event",
            Responsibility::UtilityConversion => "utility-conversion",
            Responsibility::Lifecycle => "lifecycle",
            Responsibility::Unclassified => "unclassified",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityGrade {
    Simple,
    Medium,
    Complex,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// Descending test-urgency tier. Ordering follows urgency: P0 sorts first.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TestPriority {
    P0,
    P1,
    P2,
    P3,
}

impl TestPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TestPriority::P0 => "Parsing & Encoding (highest priority)",
            TestPriority::P1 => "Core State & Events",
            TestPriority::P2 => "Network I/O",
            TestPriority::P3 => "Utilities",
        }
    }
}

impl std::fmt::Display for TestPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestPriority::P0 => "P0",
            TestPriority::P1 => "P1",
            TestPriority::P2 => "P2",
            TestPriority::P3 => "P3",
        };
        write!(f, "{s}")
    }
}

/// Result of the classification decision procedure. Derived, never mutated;
/// recomputing from the same signature yields the same value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub responsibility: Responsibility,
    pub complexity: ComplexityGrade,
    pub risk: RiskLevel,
    pub priority: TestPriority,
}

/// A signature paired with its classification, 1:1.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifiedFunction {
    pub signature: FunctionSignature,
    pub classification: Classification,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeReason {
    #[serde(rename = "include")]
    Include,
    #[serde(rename = "qualified-call")]
    QualifiedCall,
}

impl std::fmt::Display for EdgeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeReason::Include => write!(f, "include"),
            EdgeReason::QualifiedCall => write!(f, "qualified-call"),
        }
    }
}

/// Directed dependency between two modules. Parallel edges between the same
/// pair are retained for reporting; cycle detection collapses them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct DependencyEdge {
    pub from: NamespacePath,
    pub to: NamespacePath,
    pub reason: EdgeReason,
}
