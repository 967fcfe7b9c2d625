//! Exported interfaces and type aliases with no non-definition reference
//! anywhere in the program.

use tracing::debug;

use super::DetectorContext;
use crate::issues::{Confidence, Issue, IssueKind};

pub fn detect_unused_types(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for file in &ctx.reach.reachable {
        let Some(module) = ctx.facade.module(file) else {
            continue;
        };
        for decl in &module.declarations {
            if !decl.is_top_level() || !decl.exported || !decl.kind.is_type_only() {
                continue;
            }
            let sites = match ctx.facade.find_references(file, &decl.name) {
                Ok(sites) => sites,
                Err(e) => {
                    debug!(file = %file.display(), symbol = %decl.name, error = %e,
                        "find_references unavailable; skipping type");
                    continue;
                }
            };
            let referenced = sites
                .iter()
                .any(|s| !s.is_definition && ctx.reach.is_candidate(&s.file));
            if referenced {
                continue;
            }
            let confidence = if ctx.is_dynamic(file) {
                Confidence::Low
            } else {
                Confidence::High
            };
            issues.push(
                Issue::new(
                    IssueKind::UnusedType,
                    &decl.name,
                    file,
                    decl.pos.line,
                    decl.pos.column,
                )
                .with_confidence(confidence)
                .with_symbol_kind(decl.kind)
                .with_message(format!(
                    "{} '{}' has no references",
                    decl.kind.display_name(),
                    decl.name
                )),
            );
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{
        BodyRef, DeclKind, Declaration, Import, MemoryFacade, ModuleFacts, NamedImport, RefKind,
        SourcePos,
    };
    use crate::graph::SymbolGraph;
    use crate::reachability::compute_reachability;
    use crate::resolver::ModuleResolver;
    use std::path::Path;

    #[test]
    fn test_referenced_type_not_reported() {
        let mut facade = MemoryFacade::new();

        let mut models = ModuleFacts::new("/proj/src/models.ts");
        let mut foo = Declaration::new("Foo", DeclKind::Interface);
        foo.exported = true;
        models.declarations.push(foo);
        let mut bar = Declaration::new("Bar", DeclKind::Type);
        bar.exported = true;
        models.declarations.push(bar);
        facade.add_module(models);

        let mut index = ModuleFacts::new("/proj/src/index.ts");
        let mut import = Import::new("./models");
        import.named.push(NamedImport {
            name: "Foo".into(),
            alias: None,
            type_only: true,
        });
        index.imports.push(import);
        let mut api = Declaration::new("api", DeclKind::Function);
        api.exported = true;
        api.body_refs.push(BodyRef::new(
            "Foo",
            RefKind::TypeReference,
            SourcePos::new(3, 10),
        ));
        index.declarations.push(api);
        facade.add_module(index);

        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let graph = SymbolGraph::new();
        let ctx = DetectorContext {
            facade: &facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &[],
        };

        let issues = detect_unused_types(&ctx);
        let names: Vec<&str> = issues.iter().map(|i| i.name.as_str()).collect();
        assert!(!names.contains(&"Foo"));
        assert!(names.contains(&"Bar"));
        assert_eq!(issues[0].kind, IssueKind::UnusedType);
    }
}
