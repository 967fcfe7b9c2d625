//! Instance-property detectors: never-referenced properties and
//! assign-only properties.
//!
//! Reads and writes are discovered by walking every `this.<name>` property
//! access inside the enclosing class; an initializer counts as a write.
//! External access goes through the graph's incoming edges.

use super::DetectorContext;
use crate::facade::{DeclKind, RefKind};
use crate::graph::SymbolId;
use crate::issues::{Confidence, Issue, IssueKind};

fn local_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

pub fn detect_property_issues(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for file in &ctx.reach.reachable {
        let Some(module) = ctx.facade.module(file) else {
            continue;
        };
        let confidence = if module.dynamic_access {
            Confidence::Low
        } else {
            Confidence::High
        };

        for class in &module.declarations {
            if class.kind != DeclKind::Class {
                continue;
            }
            let class_id = SymbolId::new(file, &class.name);
            let class_used = ctx
                .graph
                .node(&class_id)
                .map(|n| n.is_used)
                .unwrap_or(false);
            if !class_used {
                continue;
            }

            let members: Vec<_> = module
                .declarations
                .iter()
                .filter(|d| d.parent.as_deref() == Some(class.name.as_str()))
                .collect();

            for property in members
                .iter()
                .filter(|d| d.kind == DeclKind::Property)
            {
                let property_id = SymbolId::new(file, &property.name);
                let node = ctx.graph.node(&property_id);
                if node.is_some_and(|n| n.is_entry_point || n.retained_by.is_some())
                    || !property.decorators.is_empty()
                {
                    continue;
                }

                let this_access = format!("this.{}", local_name(&property.name));
                let mut reads = 0usize;
                let mut writes = usize::from(property.has_initializer);
                for member in &members {
                    for body_ref in &member.body_refs {
                        if body_ref.name != this_access {
                            continue;
                        }
                        // Compound assignment and ++/-- are writes at the
                        // facade level.
                        if body_ref.kind == RefKind::PropertyWrite {
                            writes += 1;
                        } else {
                            reads += 1;
                        }
                    }
                }
                // Any edge from outside the class counts as a read
                // (obj.prop from another declaration).
                let external_reads = ctx
                    .graph
                    .incoming(&property_id)
                    .iter()
                    .filter(|source| {
                        **source != class_id
                            && ctx
                                .graph
                                .node(source)
                                .map_or(true, |n| n.parent.as_ref() != Some(&class_id))
                    })
                    .count();

                let property_name = local_name(&property.name);
                if reads == 0 && external_reads == 0 && writes > 0 {
                    issues.push(
                        Issue::new(
                            IssueKind::AssignOnlyProperty,
                            property_name,
                            file,
                            property.pos.line,
                            property.pos.column,
                        )
                        .with_confidence(confidence)
                        .with_symbol_kind(DeclKind::Property)
                        .with_parent(local_name(&class.name))
                        .with_message(format!(
                            "property '{}' of '{}' is written but never read",
                            property_name,
                            local_name(&class.name)
                        )),
                    );
                } else if reads == 0 && external_reads == 0 && writes == 0 {
                    issues.push(
                        Issue::new(
                            IssueKind::UnusedProperty,
                            property_name,
                            file,
                            property.pos.line,
                            property.pos.column,
                        )
                        .with_confidence(confidence)
                        .with_symbol_kind(DeclKind::Property)
                        .with_parent(local_name(&class.name))
                        .with_message(format!(
                            "property '{}' of '{}' is never referenced",
                            property_name,
                            local_name(&class.name)
                        )),
                    );
                }
            }
        }
    }
    issues
}
