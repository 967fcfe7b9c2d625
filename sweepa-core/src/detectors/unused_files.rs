//! Files in the candidate set that are neither reachable nor entries.

use super::DetectorContext;
use crate::issues::{Issue, IssueKind};

pub fn detect_unused_files(ctx: &DetectorContext<'_>) -> Vec<Issue> {
    ctx.reach
        .candidates
        .iter()
        .filter(|file| !ctx.reach.is_reachable(file) && !ctx.reach.is_entry(file))
        .map(|file| {
            let rel = ctx.reach.relative(file);
            Issue::new(IssueKind::UnusedFile, &rel, file, 1, 1)
                .with_message(format!("file '{}' is never imported", rel))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{Import, MemoryFacade, ModuleFacts};
    use crate::graph::SymbolGraph;
    use crate::reachability::compute_reachability;
    use crate::resolver::ModuleResolver;
    use std::path::Path;

    #[test]
    fn test_unreachable_file_reported() {
        let mut facade = MemoryFacade::new();
        let mut index = ModuleFacts::new("/proj/src/index.ts");
        index.imports.push(Import::new("./used"));
        facade.add_module(index);
        facade.add_module(ModuleFacts::new("/proj/src/used.ts"));
        facade.add_module(ModuleFacts::new("/proj/src/orphan.ts"));

        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let graph = SymbolGraph::new();
        let ctx = DetectorContext {
            facade: &facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &[],
        };

        let issues = detect_unused_files(&ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "src/orphan.ts");
        assert_eq!(issues[0].kind, IssueKind::UnusedFile);
    }

    #[test]
    fn test_empty_project_no_issues() {
        let facade = MemoryFacade::new();
        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let graph = SymbolGraph::new();
        let ctx = DetectorContext {
            facade: &facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &[],
        };
        assert!(detect_unused_files(&ctx).is_empty());
    }
}
