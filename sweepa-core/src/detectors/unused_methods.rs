//! Class methods with zero call sites outside their class.
//!
//! Lifecycle names, override declarations and methods required by an
//! implemented interface are excluded; retained (decorated) methods never
//! reach this detector.

use super::DetectorContext;
use crate::graph::SymbolId;
use crate::issues::{Confidence, Issue, IssueKind};

/// Well-known lifecycle and protocol names a runtime or framework calls.
const LIFECYCLE_NAMES: &[&str] = &[
    "constructor",
    "render",
    "componentDidMount",
    "componentDidUpdate",
    "componentWillUnmount",
    "shouldComponentUpdate",
    "getDerivedStateFromProps",
    "ngOnInit",
    "ngOnDestroy",
    "ngOnChanges",
    "connectedCallback",
    "disconnectedCallback",
    "attributeChangedCallback",
    "toString",
    "toJSON",
    "valueOf",
];

fn local_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// A reference source is external when it is neither the class itself nor a
/// member of the same class.
fn is_external(ctx: &DetectorContext<'_>, source: &SymbolId, class: &SymbolId) -> bool {
    if source == class {
        return false;
    }
    match ctx.graph.node(source) {
        Some(node) => node.parent.as_ref() != Some(class),
        None => true,
    }
}

pub fn detect_unused_methods(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for id in ctx.graph.sorted_ids() {
        let Some(node) = ctx.graph.node(&id) else {
            continue;
        };
        if node.kind != crate::facade::DeclKind::Method
            || node.is_entry_point
            || node.retained_by.is_some()
        {
            continue;
        }
        let Some(class_id) = &node.parent else {
            continue;
        };
        // An unused class is one issue, not one per member.
        let class_used = ctx
            .graph
            .node(class_id)
            .map(|c| c.is_used)
            .unwrap_or(false);
        if !class_used || !ctx.reach.is_reachable(&id.file) {
            continue;
        }

        let method_name = local_name(&id.name);
        if LIFECYCLE_NAMES.contains(&method_name) {
            continue;
        }
        let decl = ctx
            .facade
            .module(&id.file)
            .and_then(|m| m.declaration(&id.name));
        if decl.is_some_and(|d| d.is_override || d.satisfies_interface) {
            continue;
        }

        let has_external_site = ctx
            .graph
            .incoming(&id)
            .iter()
            .any(|source| is_external(ctx, source, class_id));
        if has_external_site {
            continue;
        }

        let class_exported = ctx
            .graph
            .node(class_id)
            .map(|c| c.exported)
            .unwrap_or(false);
        let confidence = if ctx.is_dynamic(&id.file) || !node.decorators.is_empty() {
            Confidence::Low
        } else if class_exported {
            Confidence::Medium
        } else {
            Confidence::High
        };
        issues.push(
            Issue::new(
                IssueKind::UnusedMethod,
                method_name,
                &id.file,
                node.pos.line,
                node.pos.column,
            )
            .with_confidence(confidence)
            .with_symbol_kind(node.kind)
            .with_parent(local_name(&class_id.name))
            .with_message(format!(
                "method '{}' of '{}' has no call sites",
                method_name,
                local_name(&class_id.name)
            )),
        );
    }
    issues
}
