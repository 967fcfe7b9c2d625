//! Call-graph mode: exported top-level symbols the final marking pass never
//! reached. Module-level variables report as `unused-variable`, type-only
//! declarations are left to the dedicated type detector.

use super::DetectorContext;
use crate::exports::ExportAnalysis;
use crate::facade::DeclKind;
use crate::issues::{Confidence, Issue, IssueKind};

pub fn detect_unused_exports(
    ctx: &DetectorContext<'_>,
    export_usage: Option<&ExportAnalysis>,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    for id in ctx.graph.sorted_ids() {
        let Some(node) = ctx.graph.node(&id) else {
            continue;
        };
        if id.is_module()
            || node.parent.is_some()
            || !node.exported
            || node.is_used
            || node.is_entry_point
            || node.retained_by.is_some()
        {
            continue;
        }
        if node.kind.is_type_only() {
            continue;
        }
        // Unreachable files are reported whole; symbol-level issues would be
        // noise on top.
        if !ctx.reach.is_reachable(&id.file) {
            continue;
        }
        // Conservative namespace/default imports: the boundary analysis may
        // know the export is used even when no edge reaches it.
        if let Some(analysis) = export_usage {
            let export_name = if node.default_export {
                "default"
            } else {
                id.name.as_str()
            };
            if analysis
                .usage
                .get(&id.file)
                .is_some_and(|u| u.is_used(export_name))
            {
                continue;
            }
        }

        let kind = match node.kind {
            DeclKind::Variable => IssueKind::UnusedVariable,
            _ => IssueKind::UnusedExport,
        };
        let confidence = if ctx.is_dynamic(&id.file) || !node.decorators.is_empty() {
            Confidence::Low
        } else if !ctx.graph.incoming(&id).is_empty() {
            // Referenced somewhere, just not from a live container.
            Confidence::Medium
        } else {
            Confidence::High
        };
        issues.push(
            Issue::new(kind, &id.name, &id.file, node.pos.line, node.pos.column)
                .with_confidence(confidence)
                .with_symbol_kind(node.kind)
                .with_message(format!(
                    "{} '{}' is exported but never used",
                    node.kind.display_name(),
                    id.name
                )),
        );
    }
    issues
}
