//! Phase 4: the final reachability DFS.
//!
//! From each entry point, traverse outgoing edges transitively; visiting a
//! symbol also visits its parent (marking a method implies marking its
//! class). Retained symbols not reached from any entry are visited
//! afterwards. On completion `is_used` holds iff the symbol was visited.

use std::collections::HashSet;

use anyhow::Result;

use super::{Mutator, MutatorContext, Phase};
use crate::graph::{SymbolGraph, SymbolId};

pub struct UsedDeclarationMarker;

impl Mutator for UsedDeclarationMarker {
    fn name(&self) -> &'static str {
        "used-declaration-marker"
    }

    fn phase(&self) -> Phase {
        Phase::Marking
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) -> Result<()> {
        let mut visited: HashSet<SymbolId> = HashSet::new();

        visit_all(ctx.graph, ctx.graph.entry_points(), &mut visited);
        visit_all(ctx.graph, ctx.graph.retained(), &mut visited);

        for id in ctx.graph.sorted_ids() {
            if let Some(node) = ctx.graph.node_mut(&id) {
                node.is_used = visited.contains(&id);
            }
        }
        Ok(())
    }
}

/// Iterative DFS over outgoing edges, pulling in parents along the way.
fn visit_all(graph: &SymbolGraph, roots: Vec<SymbolId>, visited: &mut HashSet<SymbolId>) {
    let mut stack: Vec<SymbolId> = roots;
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(node) = graph.node(&id) {
            if let Some(parent) = &node.parent {
                if !visited.contains(parent) {
                    stack.push(parent.clone());
                }
            }
        }
        for neighbor in graph.outgoing(&id) {
            if !visited.contains(neighbor) {
                stack.push(neighbor.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepaConfig;
    use crate::facade::{DeclKind, MemoryFacade, RefKind, SourcePos};
    use crate::graph::{EdgeInfo, SymbolNode};
    use crate::reachability::FileReachability;
    use crate::resolver::ModuleResolver;
    use std::path::Path;

    fn edge_info() -> EdgeInfo {
        EdgeInfo {
            kind: RefKind::Call,
            file: "/proj/src/a.ts".into(),
            pos: SourcePos::default(),
        }
    }

    fn mark(graph: &mut crate::graph::SymbolGraph) {
        let facade = MemoryFacade::new();
        let resolver = ModuleResolver::new(&facade);
        let config = SweepaConfig::default();
        let reach = FileReachability::default();
        let mut ctx = MutatorContext {
            graph,
            facade: &facade,
            resolver: &resolver,
            root: Path::new("/proj"),
            frameworks: &[],
            manifest: None,
            config: &config,
            reach: &reach,
        };
        UsedDeclarationMarker.run(&mut ctx).unwrap();
    }

    #[test]
    fn test_transitive_marking_from_entry() {
        let mut graph = crate::graph::SymbolGraph::new();
        let a = SymbolId::new("/proj/src/a.ts", "a");
        let b = SymbolId::new("/proj/src/a.ts", "b");
        let c = SymbolId::new("/proj/src/a.ts", "c");
        let dead = SymbolId::new("/proj/src/a.ts", "dead");
        for id in [&a, &b, &c, &dead] {
            graph.add_node(SymbolNode::new(id.clone(), DeclKind::Function));
        }
        graph.add_edge(a.clone(), b.clone(), edge_info());
        graph.add_edge(b.clone(), c.clone(), edge_info());
        graph.mark_entry_point(&a, "test entry");

        mark(&mut graph);

        assert!(graph.node(&a).unwrap().is_used);
        assert!(graph.node(&b).unwrap().is_used);
        assert!(graph.node(&c).unwrap().is_used);
        assert!(!graph.node(&dead).unwrap().is_used);
    }

    #[test]
    fn test_visiting_method_marks_class() {
        let mut graph = crate::graph::SymbolGraph::new();
        let class = SymbolId::new("/proj/src/a.ts", "Service");
        let method = SymbolId::new("/proj/src/a.ts", "Service.run");
        let caller = SymbolId::new("/proj/src/b.ts", "main");
        graph.add_node(SymbolNode::new(class.clone(), DeclKind::Class));
        let mut method_node = SymbolNode::new(method.clone(), DeclKind::Method);
        method_node.parent = Some(class.clone());
        graph.add_node(method_node);
        graph.add_node(SymbolNode::new(caller.clone(), DeclKind::Function));
        graph.add_edge(caller.clone(), method.clone(), edge_info());
        graph.mark_entry_point(&caller, "test entry");

        mark(&mut graph);

        assert!(graph.node(&method).unwrap().is_used);
        assert!(graph.node(&class).unwrap().is_used, "parent pulled in");
    }

    #[test]
    fn test_retained_marked_without_reachability() {
        let mut graph = crate::graph::SymbolGraph::new();
        let orphan = SymbolId::new("/proj/src/a.ts", "orphan");
        graph.add_node(SymbolNode::new(orphan.clone(), DeclKind::Method));
        graph.mark_retained(&orphan, "decorated with @Get");

        mark(&mut graph);

        assert!(graph.node(&orphan).unwrap().is_used);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = crate::graph::SymbolGraph::new();
        let a = SymbolId::new("/proj/src/a.ts", "a");
        let b = SymbolId::new("/proj/src/a.ts", "b");
        graph.add_node(SymbolNode::new(a.clone(), DeclKind::Function));
        graph.add_node(SymbolNode::new(b.clone(), DeclKind::Function));
        graph.add_edge(a.clone(), b.clone(), edge_info());
        graph.add_edge(b.clone(), a.clone(), edge_info());
        graph.mark_entry_point(&a, "test entry");

        mark(&mut graph);
        assert!(graph.node(&b).unwrap().is_used);
    }

    #[test]
    fn test_unreferenced_not_used() {
        let mut graph = crate::graph::SymbolGraph::new();
        let a = SymbolId::new("/proj/src/a.ts", "a");
        graph.add_node(SymbolNode::new(a.clone(), DeclKind::Function));
        mark(&mut graph);
        assert!(!graph.node(&a).unwrap().is_used);
    }
}
