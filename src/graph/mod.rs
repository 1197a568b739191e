//! Module aggregation and dependency-graph construction.
//!
//! Modules are namespace-keyed aggregates of the per-file scans. The graph
//! keeps an arena of module nodes addressed by index; cycle detection is an
//! explicit stack-based depth-first traversal with an on-stack marker per
//! node, so stack depth stays bounded on large synthetic graphs. A
//! back-edge to an on-stack node closes a cycle, recorded as the stack
//! slice from that node forward. Self-edges are kept in the edge list but
//! never reported as cycles; cycles are deduplicated by rotating each one
//! so its lexicographically smallest member comes first.

use crate::core::{DependencyEdge, EdgeReason, Module, NamespacePath, Project};
use crate::extract::FileScan;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Group file scans into namespace-keyed modules. Each file contributes its
/// path to every module whose namespace it opens, and external dependency
/// names referenced by the file (via includes or qualified usages) are
/// attributed to those modules.
pub fn build_modules(project: &Project, scans: &[FileScan]) -> Vec<Module> {
    let mut modules: BTreeMap<NamespacePath, Module> = BTreeMap::new();

    for scan in scans {
        let external_refs = external_refs_in_scan(project, scan);
        for path in &scan.namespaces {
            let module = modules
                .entry(path.clone())
                .or_insert_with(|| Module::new(path.clone()));
            module.headers.insert(scan.file.clone());
            module.external_refs.extend(external_refs.iter().cloned());
        }
    }

    modules.into_values().collect()
}

/// External dependency names actually referenced by one file, matched
/// case-insensitively against include path roots and qualified-name roots.
fn external_refs_in_scan(project: &Project, scan: &FileScan) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    let mut roots: Vec<String> = Vec::new();
    for include in &scan.includes {
        if let Some(root) = include.split(['/', '\\']).next() {
            roots.push(root.to_lowercase());
        }
    }
    for usage in &scan.usages {
        if let Some(first) = usage.to.0.first() {
            roots.push(first.to_lowercase());
        }
    }
    for dep in &project.external_deps {
        let dep_lower = dep.to_lowercase();
        if roots.iter().any(|r| *r == dep_lower) {
            refs.insert(dep.clone());
        }
    }
    refs
}

/// Directed module dependency graph over an index arena.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    nodes: Vec<NamespacePath>,
    index: HashMap<NamespacePath, usize>,
    /// Collapsed adjacency used for cycle detection; self-edges excluded.
    adjacency: Vec<Vec<usize>>,
    /// Individual edges retained for reporting, deduplicated by
    /// (from, to, reason).
    edges: Vec<DependencyEdge>,
    edge_keys: HashSet<(usize, usize, EdgeReason)>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, path: NamespacePath) -> usize {
        if let Some(&idx) = self.index.get(&path) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(path.clone(), idx);
        self.nodes.push(path);
        self.adjacency.push(Vec::new());
        idx
    }

    pub fn contains(&self, path: &NamespacePath) -> bool {
        self.index.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_edge(&mut self, from: NamespacePath, to: NamespacePath, reason: EdgeReason) {
        let from_idx = self.add_node(from.clone());
        let to_idx = self.add_node(to.clone());
        if !self.edge_keys.insert((from_idx, to_idx, reason)) {
            return;
        }
        self.edges.push(DependencyEdge { from, to, reason });
        if from_idx != to_idx && !self.adjacency[from_idx].contains(&to_idx) {
            self.adjacency[from_idx].push(to_idx);
        }
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// All elementary back-edge cycles reachable by depth-first traversal,
    /// deduplicated by rotation-normalized node sequence.
    pub fn find_cycles(&self) -> Vec<Vec<NamespacePath>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Visit {
            Unvisited,
            OnStack,
            Done,
        }

        let n = self.nodes.len();
        let mut state = vec![Visit::Unvisited; n];
        let mut found: BTreeSet<Vec<NamespacePath>> = BTreeSet::new();

        for root in 0..n {
            if state[root] != Visit::Unvisited {
                continue;
            }
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            let mut path: Vec<usize> = vec![root];
            state[root] = Visit::OnStack;

            while let Some(frame) = stack.last_mut() {
                let (node, next_child) = (frame.0, frame.1);
                if next_child < self.adjacency[node].len() {
                    frame.1 += 1;
                    let child = self.adjacency[node][next_child];
                    match state[child] {
                        Visit::Unvisited => {
                            state[child] = Visit::OnStack;
                            stack.push((child, 0));
                            path.push(child);
                        }
                        Visit::OnStack => {
                            let pos = path
                                .iter()
                                .position(|&p| p == child)
                                .expect("on-stack node is on the path");
                            found.insert(self.normalize_cycle(&path[pos..]));
                        }
                        Visit::Done => {}
                    }
                } else {
                    state[node] = Visit::Done;
                    stack.pop();
                    path.pop();
                }
            }
        }

        found.into_iter().collect()
    }

    /// Rotate a cycle so the smallest module path comes first; A→B→C→A is
    /// the same cycle no matter which node it was entered from.
    fn normalize_cycle(&self, indices: &[usize]) -> Vec<NamespacePath> {
        let min_pos = (0..indices.len())
            .min_by_key(|&pos| &self.nodes[indices[pos]])
            .unwrap_or(0);
        indices[min_pos..]
            .iter()
            .chain(indices[..min_pos].iter())
            .map(|&idx| self.nodes[idx].clone())
            .collect()
    }
}

/// Build the dependency graph from modules and per-file scans. Edges are
/// emitted only between known modules; unknown namespace roots (`std` and
/// friends) are not project modules and produce nothing.
pub fn build_graph(modules: &[Module], scans: &[FileScan]) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for module in modules {
        graph.add_node(module.path.clone());
    }

    for scan in scans {
        // The file's first namespace is its primary module; includes are
        // attributed to it.
        let primary = scan.namespaces.first().cloned();

        for include in &scan.includes {
            let Some(from) = primary.clone() else {
                break;
            };
            let candidate = include_candidate(include);
            if candidate.is_root() || !graph.contains(&candidate) {
                continue;
            }
            if candidate != from {
                graph.add_edge(from, candidate, EdgeReason::Include);
            }
        }

        for usage in &scan.usages {
            if !graph.contains(&usage.from) || !graph.contains(&usage.to) {
                continue;
            }
            graph.add_edge(usage.from.clone(), usage.to.clone(), usage.reason);
        }
    }
    graph
}

/// Namespace candidate for an include path: directory components with the
/// file name dropped, `simple/net/socket.hpp` → `simple::net`.
fn include_candidate(include: &str) -> NamespacePath {
    let mut parts: Vec<String> = include
        .split(['/', '\\'])
        .map(str::to_string)
        .collect();
    parts.pop();
    NamespacePath::new(parts)
}
