//! Import bindings with no use in the importing file.
//!
//! Type-only imports are excluded. Export forwarding (`export { binding }`)
//! does not count as a use; the re-export itself is covered by the
//! module-boundary analysis.

use std::collections::BTreeSet;

use super::DetectorContext;
use crate::issues::{Confidence, Issue, IssueKind};

fn first_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

pub fn detect_unused_imports(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for file in &ctx.reach.reachable {
        let Some(module) = ctx.facade.module(file) else {
            continue;
        };

        // Every identifier root used anywhere in the file: declaration
        // bodies, top-level statements, JSX tags and decorators.
        let mut used: BTreeSet<&str> = BTreeSet::new();
        for decl in &module.declarations {
            for body_ref in &decl.body_refs {
                used.insert(first_segment(&body_ref.name));
            }
            for tag in &decl.jsx_tags {
                used.insert(first_segment(&tag.name));
            }
            for decorator in &decl.decorators {
                used.insert(first_segment(decorator));
            }
        }
        for body_ref in &module.module_refs {
            used.insert(first_segment(&body_ref.name));
        }
        for tag in &module.module_jsx {
            used.insert(first_segment(&tag.name));
        }

        let confidence = if module.dynamic_access {
            Confidence::Low
        } else {
            Confidence::High
        };

        for import in &module.imports {
            if import.type_only {
                continue;
            }
            let mut bindings: Vec<&str> = Vec::new();
            for named in &import.named {
                if !named.type_only {
                    bindings.push(named.binding());
                }
            }
            if let Some(default) = &import.default_binding {
                bindings.push(default);
            }
            if let Some(namespace) = &import.namespace_binding {
                bindings.push(namespace);
            }
            for binding in bindings {
                if used.contains(binding) {
                    continue;
                }
                issues.push(
                    Issue::new(
                        IssueKind::UnusedImport,
                        binding,
                        file,
                        import.pos.line,
                        import.pos.column,
                    )
                    .with_confidence(confidence)
                    .with_message(format!(
                        "import '{}' from '{}' is never used",
                        binding, import.specifier
                    )),
                );
            }
        }
    }
    issues
}
