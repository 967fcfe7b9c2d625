//! Exported symbols whose references never leave their own file
//! (make-private) or their own package (make-internal).
//!
//! The package boundary is the directory of the nearest manifest; the
//! make-internal suggestion only applies when the tree has more than one
//! package.

use tracing::debug;

use super::DetectorContext;
use crate::issues::{Confidence, Issue, IssueKind};
use crate::manifest::package_boundary;

pub fn detect_redundant_exports(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for id in ctx.graph.sorted_ids() {
        let Some(node) = ctx.graph.node(&id) else {
            continue;
        };
        if id.is_module()
            || node.parent.is_some()
            || !node.exported
            || !node.is_used
            || node.is_entry_point
            || node.retained_by.is_some()
            || !ctx.reach.is_reachable(&id.file)
        {
            continue;
        }

        let sites = match ctx.facade.find_references(&id.file, &id.name) {
            Ok(sites) => sites,
            Err(e) => {
                debug!(symbol = %id, error = %e, "find_references unavailable; skipping");
                continue;
            }
        };
        let reference_files: Vec<_> = sites
            .iter()
            .filter(|s| !s.is_definition && ctx.reach.is_candidate(&s.file))
            .map(|s| s.file.clone())
            .collect();
        if reference_files.is_empty() {
            // Fully unused; the unused-export detectors own that case.
            continue;
        }

        if reference_files.iter().all(|f| *f == id.file) {
            issues.push(
                Issue::new(
                    IssueKind::RedundantExport,
                    &id.name,
                    &id.file,
                    node.pos.line,
                    node.pos.column,
                )
                .with_confidence(Confidence::Medium)
                .with_symbol_kind(node.kind)
                .with_message(format!(
                    "'{}' is only referenced in its own file; the export can be made private",
                    id.name
                )),
            );
            continue;
        }

        if ctx.manifest_dirs.len() > 1 {
            let own_package = package_boundary(&id.file, ctx.manifest_dirs);
            if own_package.is_some()
                && reference_files
                    .iter()
                    .all(|f| package_boundary(f, ctx.manifest_dirs) == own_package)
            {
                issues.push(
                    Issue::new(
                        IssueKind::RedundantExport,
                        &id.name,
                        &id.file,
                        node.pos.line,
                        node.pos.column,
                    )
                    .with_confidence(Confidence::Medium)
                    .with_symbol_kind(node.kind)
                    .with_message(format!(
                        "'{}' is only referenced inside its own package; the export can be made internal",
                        id.name
                    )),
                );
            }
        }
    }
    issues
}
