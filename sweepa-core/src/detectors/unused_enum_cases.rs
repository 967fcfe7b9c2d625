//! Enum members with zero external references. References from other
//! members of the same declaration are not external.

use super::DetectorContext;
use crate::facade::DeclKind;
use crate::graph::SymbolId;
use crate::issues::{Confidence, Issue, IssueKind};

fn local_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn is_external(ctx: &DetectorContext<'_>, source: &SymbolId, enum_id: &SymbolId) -> bool {
    if source == enum_id {
        return false;
    }
    match ctx.graph.node(source) {
        Some(node) => node.parent.as_ref() != Some(enum_id),
        None => true,
    }
}

pub fn detect_unused_enum_cases(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for id in ctx.graph.sorted_ids() {
        let Some(node) = ctx.graph.node(&id) else {
            continue;
        };
        if node.kind != DeclKind::EnumMember
            || node.is_entry_point
            || node.retained_by.is_some()
        {
            continue;
        }
        let Some(enum_id) = &node.parent else {
            continue;
        };
        let enum_used = ctx.graph.node(enum_id).map(|e| e.is_used).unwrap_or(false);
        if !enum_used || !ctx.reach.is_reachable(&id.file) {
            continue;
        }
        let referenced = ctx
            .graph
            .incoming(&id)
            .iter()
            .any(|source| is_external(ctx, source, enum_id));
        if referenced {
            continue;
        }
        // Enums are a favourite target of string-keyed lookups.
        let confidence = if ctx.is_dynamic(&id.file) {
            Confidence::Low
        } else {
            Confidence::High
        };
        let member = local_name(&id.name);
        issues.push(
            Issue::new(
                IssueKind::UnusedEnumCase,
                member,
                &id.file,
                node.pos.line,
                node.pos.column,
            )
            .with_confidence(confidence)
            .with_symbol_kind(node.kind)
            .with_parent(local_name(&enum_id.name))
            .with_message(format!(
                "enum member '{}' of '{}' is never referenced",
                member,
                local_name(&enum_id.name)
            )),
        );
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{MemoryFacade, ModuleFacts, RefKind, SourcePos};
    use crate::graph::{EdgeInfo, SymbolGraph, SymbolNode};
    use crate::reachability::compute_reachability;
    use crate::resolver::ModuleResolver;
    use std::path::Path;

    #[test]
    fn test_unreferenced_member_reported() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/src/index.ts"));
        let file = Path::new("/proj/src/index.ts");

        let mut graph = SymbolGraph::new();
        let enum_id = SymbolId::new(file, "Status");
        let mut enum_node = SymbolNode::new(enum_id.clone(), DeclKind::Enum);
        enum_node.is_used = true;
        graph.add_node(enum_node);
        for member in ["Status.Active", "Status.Stale"] {
            let mut node = SymbolNode::new(SymbolId::new(file, member), DeclKind::EnumMember);
            node.parent = Some(enum_id.clone());
            graph.add_node(node);
        }
        let user = SymbolId::new(file, "report");
        let mut user_node = SymbolNode::new(user.clone(), DeclKind::Function);
        user_node.is_used = true;
        graph.add_node(user_node);
        graph.add_edge(
            user,
            SymbolId::new(file, "Status.Active"),
            EdgeInfo {
                kind: RefKind::PropertyRead,
                file: file.to_path_buf(),
                pos: SourcePos::new(4, 2),
            },
        );

        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let ctx = DetectorContext {
            facade: &facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &[],
        };

        let issues = detect_unused_enum_cases(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "Stale");
        assert_eq!(issues[0].parent.as_deref(), Some("Status"));
    }

    #[test]
    fn test_sibling_reference_is_not_external() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/src/index.ts"));
        let file = Path::new("/proj/src/index.ts");

        let mut graph = SymbolGraph::new();
        let enum_id = SymbolId::new(file, "Status");
        let mut enum_node = SymbolNode::new(enum_id.clone(), DeclKind::Enum);
        enum_node.is_used = true;
        graph.add_node(enum_node);
        for member in ["Status.A", "Status.B"] {
            let mut node = SymbolNode::new(SymbolId::new(file, member), DeclKind::EnumMember);
            node.parent = Some(enum_id.clone());
            graph.add_node(node);
        }
        // B = A: a member initialized from its sibling.
        graph.add_edge(
            SymbolId::new(file, "Status.B"),
            SymbolId::new(file, "Status.A"),
            EdgeInfo {
                kind: RefKind::PropertyRead,
                file: file.to_path_buf(),
                pos: SourcePos::new(3, 7),
            },
        );

        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let ctx = DetectorContext {
            facade: &facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &[],
        };

        let issues = detect_unused_enum_cases(&ctx);
        let names: Vec<&str> = issues.iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"A"), "sibling reference is internal");
        assert!(names.contains(&"B"));
    }
}
