//! The symbol reference graph.
//!
//! Nodes are declarations keyed by `(absolute_file_path, qualified_name)`;
//! edges are set-semantics references (at most one edge per ordered pair —
//! reachability only cares about existence). The graph keeps forward and
//! reverse adjacency lists so both "what does X use" and "who uses X" are
//! O(1) lookups.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::facade::{DeclKind, RefKind, SourcePos};

/// Qualified name of the synthetic node representing a file's top-level
/// scope. References made outside any declaration source from this node.
pub const MODULE_SYMBOL: &str = "<module>";

/// Symbol identity: absolute file path plus qualified name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId {
    pub file: PathBuf,
    pub name: String,
}

impl SymbolId {
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }

    /// The `<module>` node of a file.
    pub fn module(file: impl Into<PathBuf>) -> Self {
        Self::new(file, MODULE_SYMBOL)
    }

    pub fn is_module(&self) -> bool {
        self.name == MODULE_SYMBOL
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.file.display(), self.name)
    }
}

/// A node of the symbol graph.
#[derive(Debug, Clone)]
pub struct SymbolNode {
    pub id: SymbolId,
    pub kind: DeclKind,
    pub pos: SourcePos,
    pub exported: bool,
    pub default_export: bool,
    pub is_entry_point: bool,
    pub entry_point_reason: Option<String>,
    /// Set by a retention pass; makes the symbol immune to unused reporting.
    pub retained_by: Option<String>,
    pub is_used: bool,
    pub parent: Option<SymbolId>,
    pub decorators: Vec<String>,
}

impl SymbolNode {
    pub fn new(id: SymbolId, kind: DeclKind) -> Self {
        Self {
            id,
            kind,
            pos: SourcePos::default(),
            exported: false,
            default_export: false,
            is_entry_point: false,
            entry_point_reason: None,
            retained_by: None,
            is_used: false,
            parent: None,
            decorators: Vec::new(),
        }
    }
}

/// Location and kind of a reference edge.
#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub kind: RefKind,
    pub file: PathBuf,
    pub pos: SourcePos,
}

/// The symbol reference graph.
#[derive(Debug, Default)]
pub struct SymbolGraph {
    pub nodes: HashMap<SymbolId, SymbolNode>,
    /// Set-semantics edges; the first edge for an ordered pair wins.
    pub edges: HashMap<(SymbolId, SymbolId), EdgeInfo>,
    /// Forward adjacency: from -> [to].
    pub adjacency: HashMap<SymbolId, Vec<SymbolId>>,
    /// Reverse adjacency: to -> [from].
    pub reverse: HashMap<SymbolId, Vec<SymbolId>>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. An existing node with the same identity wins
    /// (duplicates merge); placeholder nodes created by `ensure_node` are
    /// upgraded in place.
    pub fn add_node(&mut self, node: SymbolNode) {
        match self.nodes.get_mut(&node.id) {
            Some(existing) => {
                if existing.kind == DeclKind::Module && node.kind != DeclKind::Module {
                    // A lazily created placeholder; adopt the real attributes.
                    let id = existing.id.clone();
                    let was_entry = existing.is_entry_point;
                    let reason = existing.entry_point_reason.take();
                    *existing = node;
                    existing.id = id;
                    if was_entry {
                        existing.is_entry_point = true;
                        existing.entry_point_reason = reason;
                    }
                }
            }
            None => {
                self.nodes.insert(node.id.clone(), node);
            }
        }
    }

    /// Get a node, creating it on demand with inferred attributes. Used when
    /// an edge endpoint does not exist yet (graph-inconsistency recovery).
    pub fn ensure_node(&mut self, id: &SymbolId) -> &mut SymbolNode {
        if !self.nodes.contains_key(id) {
            // Inferred attributes: placeholder kind until (if ever) a real
            // declaration upgrades the node.
            self.nodes
                .insert(id.clone(), SymbolNode::new(id.clone(), DeclKind::Module));
        }
        self.nodes.get_mut(id).expect("node just ensured")
    }

    /// Add an edge. Self-references and duplicate ordered pairs are dropped.
    /// Missing endpoints are created on demand. Returns true when the edge
    /// was new.
    pub fn add_edge(&mut self, from: SymbolId, to: SymbolId, info: EdgeInfo) -> bool {
        if from == to {
            return false;
        }
        self.ensure_node(&from);
        self.ensure_node(&to);
        let key = (from.clone(), to.clone());
        if self.edges.contains_key(&key) {
            return false;
        }
        self.edges.insert(key, info);
        self.adjacency.entry(from.clone()).or_default().push(to.clone());
        self.reverse.entry(to).or_default().push(from);
        true
    }

    pub fn node(&self, id: &SymbolId) -> Option<&SymbolNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &SymbolId) -> Option<&mut SymbolNode> {
        self.nodes.get_mut(id)
    }

    /// Outgoing neighbors of a node.
    pub fn outgoing(&self, id: &SymbolId) -> &[SymbolId] {
        self.adjacency.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Incoming neighbors of a node.
    pub fn incoming(&self, id: &SymbolId) -> &[SymbolId] {
        self.reverse.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Node ids in stable (sorted) order, for deterministic iteration.
    pub fn sorted_ids(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Nodes of one file, in stable order.
    pub fn nodes_of_file<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a SymbolNode> {
        let mut nodes: Vec<&SymbolNode> =
            self.nodes.values().filter(|n| n.id.file == file).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes.into_iter()
    }

    /// Mark a node as an entry point with a human-readable reason.
    pub fn mark_entry_point(&mut self, id: &SymbolId, reason: impl Into<String>) {
        let node = self.ensure_node(id);
        if !node.is_entry_point {
            node.is_entry_point = true;
            node.entry_point_reason = Some(reason.into());
        }
    }

    /// Mark a node as retained. Retained symbols are also marked used.
    pub fn mark_retained(&mut self, id: &SymbolId, reason: impl Into<String>) {
        let node = self.ensure_node(id);
        if node.retained_by.is_none() {
            node.retained_by = Some(reason.into());
        }
        node.is_used = true;
    }

    /// All entry-point ids, sorted.
    pub fn entry_points(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self
            .nodes
            .values()
            .filter(|n| n.is_entry_point)
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// All retained ids, sorted.
    pub fn retained(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self
            .nodes
            .values()
            .filter(|n| n.retained_by.is_some())
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
