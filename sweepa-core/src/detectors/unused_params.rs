//! Parameters whose name is never read inside the body.
//!
//! Destructured patterns are checked per sub-binding; rest parameters and
//! signature-bound positions (interface conformance, typed callbacks) are
//! skipped, as are the conventional `_`-prefixed opt-outs.

use super::DetectorContext;
use crate::facade::DeclKind;
use crate::issues::{Confidence, Issue, IssueKind};

pub fn detect_unused_params(ctx: &DetectorContext<'_>) -> Vec<Issue> {
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
        for decl in &module.declarations {
            for param in &decl.params {
                if param.rest || param.signature_bound {
                    continue;
                }
                for binding in &param.bindings {
                    if binding.read || binding.name.starts_with('_') {
                        continue;
                    }
                    issues.push(
                        Issue::new(
                            IssueKind::UnusedParam,
                            &binding.name,
                            file,
                            param.pos.line,
                            param.pos.column,
                        )
                        .with_confidence(confidence)
                        .with_symbol_kind(DeclKind::Parameter)
                        .with_parent(&decl.name)
                        .with_message(format!(
                            "parameter '{}' of '{}' is never read",
                            binding.name, decl.name
                        )),
                    );
                }
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{
        Declaration, MemoryFacade, ModuleFacts, ParamBinding, ParamPattern, SourcePos,
    };
    use crate::graph::SymbolGraph;
    use crate::reachability::compute_reachability;
    use crate::resolver::ModuleResolver;
    use std::path::Path;

    fn pattern(bindings: &[(&str, bool)], rest: bool, signature_bound: bool) -> ParamPattern {
        ParamPattern {
            bindings: bindings
                .iter()
                .map(|(name, read)| ParamBinding {
                    name: name.to_string(),
                    read: *read,
                })
                .collect(),
            rest,
            signature_bound,
            pos: SourcePos::new(1, 20),
        }
    }

    fn detect(decl: Declaration) -> Vec<Issue> {
        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/src/index.ts");
        m.declarations.push(decl);
        facade.add_module(m);

        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let graph = SymbolGraph::new();
        let ctx = DetectorContext {
            facade: &facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &[],
        };
        detect_unused_params(&ctx)
    }

    #[test]
    fn test_unread_binding_reported() {
        let mut f = Declaration::new("handler", DeclKind::Function);
        f.params.push(pattern(&[("req", true), ("res", false)], false, false));
        let issues = detect(f);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "res");
        assert_eq!(issues[0].parent.as_deref(), Some("handler"));
    }

    #[test]
    fn test_destructured_bindings_checked_individually() {
        let mut f = Declaration::new("draw", DeclKind::Function);
        f.params
            .push(pattern(&[("x", true), ("y", false), ("z", false)], false, false));
        let issues = detect(f);
        let names: Vec<&str> = issues.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["y", "z"]);
    }

    #[test]
    fn test_rest_and_signature_bound_skipped() {
        let mut f = Declaration::new("wrap", DeclKind::Function);
        f.params.push(pattern(&[("args", false)], true, false));
        f.params.push(pattern(&[("event", false)], false, true));
        assert!(detect(f).is_empty());
    }

    #[test]
    fn test_underscore_prefix_opts_out() {
        let mut f = Declaration::new("cb", DeclKind::Function);
        f.params.push(pattern(&[("_unused", false)], false, false));
        assert!(detect(f).is_empty());
    }
}
