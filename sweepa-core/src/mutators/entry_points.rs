//! Phase 1: entry-point marking.
//!
//! Framework entry files mark their convention exports as entry points and
//! their `<module>` node as entry (route-style files are imported for side
//! effects). App entry files (root `index`/`main`/... and config basenames)
//! mark every symbol, exported or not, because such files execute top-level
//! code.

use anyhow::Result;

use super::{Mutator, MutatorContext, Phase};
use crate::frameworks::{entry_export_filter, ExportFilter};
use crate::graph::SymbolId;

pub struct EntryPointRetainer;

impl Mutator for EntryPointRetainer {
    fn name(&self) -> &'static str {
        "entry-point-retainer"
    }

    fn phase(&self) -> Phase {
        Phase::EntryPoints
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) -> Result<()> {
        let files: Vec<_> = ctx.reach.candidates.iter().cloned().collect();
        for file in files {
            let rel = ctx.reach.relative(&file);

            if let Some(filter) = entry_export_filter(ctx.frameworks, &rel) {
                // Route-style modules execute for their side effects.
                ctx.mark_entry_point(
                    &SymbolId::module(&file),
                    format!("framework entry file {}", rel),
                );
                let exported: Vec<(SymbolId, String)> = ctx
                    .graph
                    .nodes_of_file(&file)
                    .filter(|n| n.exported)
                    .map(|n| (n.id.clone(), export_name(n)))
                    .collect();
                for (id, export_name) in exported {
                    let matched = match &filter {
                        ExportFilter::All => true,
                        ExportFilter::Named(names) => names.contains(&export_name),
                    };
                    if matched {
                        ctx.mark_entry_point(
                            &id,
                            format!("framework entry export '{}' in {}", export_name, rel),
                        );
                    }
                }
            }

            if ctx.reach.is_entry(&file) && entry_export_filter(ctx.frameworks, &rel).is_none() {
                // App entry file: top-level code runs, so every symbol is
                // live regardless of export status.
                ctx.mark_entry_point(&SymbolId::module(&file), format!("app entry file {}", rel));
                let ids: Vec<SymbolId> = ctx
                    .graph
                    .nodes_of_file(&file)
                    .map(|n| n.id.clone())
                    .collect();
                for id in ids {
                    ctx.mark_entry_point(&id, format!("app entry file {}", rel));
                }
            }
        }
        Ok(())
    }
}

/// The name under which a symbol is exported.
fn export_name(node: &crate::graph::SymbolNode) -> String {
    if node.default_export {
        "default".to_string()
    } else {
        node.id.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepaConfig;
    use crate::facade::{DeclKind, Declaration, MemoryFacade, ModuleFacts};
    use crate::frameworks::FrameworkRegistry;
    use crate::graph_builder::build_symbol_graph;
    use crate::manifest::PackageManifest;
    use crate::mutators::run_pipeline;
    use crate::reachability::compute_reachability;
    use crate::resolver::ModuleResolver;
    use std::path::Path;

    #[test]
    fn test_app_entry_marks_all_symbols() {
        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/src/main.ts");
        m.declarations
            .push(Declaration::new("boot", DeclKind::Function));
        let mut helper = Declaration::new("helper", DeclKind::Function);
        helper.exported = true;
        m.declarations.push(helper);
        facade.add_module(m);

        let resolver = ModuleResolver::new(&facade);
        let reach = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        let mut graph = build_symbol_graph(&facade, &resolver, &reach);
        let config = SweepaConfig::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            resolver: &resolver,
            root: Path::new("/proj"),
            frameworks: &[],
            manifest: None,
            config: &config,
            reach: &reach,
        };
        let mut mutators: Vec<Box<dyn Mutator>> = vec![Box::new(EntryPointRetainer)];
        run_pipeline(&mut mutators, &mut ctx).unwrap();

        let boot = graph
            .node(&SymbolId::new("/proj/src/main.ts", "boot"))
            .unwrap();
        assert!(boot.is_entry_point, "non-exported symbol in app entry file");
        assert!(boot
            .entry_point_reason
            .as_deref()
            .unwrap()
            .contains("app entry file"));
    }

    #[test]
    fn test_framework_entry_marks_convention_exports_only() {
        let manifest = PackageManifest::parse(
            Path::new("/proj/package.json"),
            r#"{"dependencies": {"next": "14.2.0"}}"#,
        )
        .unwrap();
        let frameworks =
            FrameworkRegistry::with_builtins().detect_all(Path::new("/proj"), &manifest);

        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/pages/index.tsx");
        let mut home = Declaration::new("Home", DeclKind::Function);
        home.exported = true;
        home.default_export = true;
        m.declarations.push(home);
        let mut stray = Declaration::new("stray", DeclKind::Function);
        stray.exported = true;
        m.declarations.push(stray);
        facade.add_module(m);

        let resolver = ModuleResolver::new(&facade);
        let reach =
            compute_reachability(&facade, &resolver, &frameworks, Path::new("/proj"), false);
        let mut graph = build_symbol_graph(&facade, &resolver, &reach);
        let config = SweepaConfig::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            resolver: &resolver,
            root: Path::new("/proj"),
            frameworks: &frameworks,
            manifest: Some(&manifest),
            config: &config,
            reach: &reach,
        };
        let mut mutators: Vec<Box<dyn Mutator>> = vec![Box::new(EntryPointRetainer)];
        run_pipeline(&mut mutators, &mut ctx).unwrap();

        assert!(
            graph
                .node(&SymbolId::new("/proj/pages/index.tsx", "Home"))
                .unwrap()
                .is_entry_point,
            "default export matches the route convention"
        );
        assert!(
            !graph
                .node(&SymbolId::new("/proj/pages/index.tsx", "stray"))
                .unwrap()
                .is_entry_point,
            "non-convention export stays reportable"
        );
        assert!(
            graph
                .node(&SymbolId::module("/proj/pages/index.tsx"))
                .unwrap()
                .is_entry_point,
            "route module node is an entry"
        );
    }
}
