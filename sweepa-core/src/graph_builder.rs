//! Symbol graph construction from the compiler facade.
//!
//! Nodes first, then edges. Outgoing edges come from each declaration's
//! body references, resolved local-first and then through the file's
//! imports with one hop of re-export indirection. Incoming edges come from
//! the facade's find-references on top-level declarations: the containing
//! declaration (or the file's `<module>` node) points at the referenced
//! symbol. Identifiers without a resolvable symbol are skipped; edges to
//! symbols outside the project are silently dropped.

use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use crate::facade::{CompilerFacade, Declaration, RefKind};
use crate::graph::{EdgeInfo, SymbolGraph, SymbolId, SymbolNode};
use crate::reachability::FileReachability;
use crate::resolver::ModuleResolver;

/// Resolve an identifier visible in `file` to its defining symbol.
///
/// Resolution order: qualified local declaration, bare local declaration,
/// import bindings (named, default, namespace). A namespace binding without
/// a member access resolves to the target file's `<module>` node.
pub(crate) fn resolve_ident(
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    file: &Path,
    name: &str,
) -> Option<SymbolId> {
    if name.starts_with("this.") {
        return None;
    }
    let module = facade.module(file)?;
    let (head, member) = match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    };

    if member.is_some() && module.declaration(name).is_some() {
        return Some(SymbolId::new(file, name));
    }
    if member.is_none() && module.declaration(head).is_some() {
        return Some(SymbolId::new(file, head));
    }

    for import in &module.imports {
        for named in &import.named {
            if named.binding() == head {
                let target = resolver.resolve(&import.specifier, file)?;
                return resolve_exported(facade, resolver, &target, &named.name);
            }
        }
        if import.default_binding.as_deref() == Some(head) {
            let target = resolver.resolve(&import.specifier, file)?;
            return resolve_exported(facade, resolver, &target, "default");
        }
        if import.namespace_binding.as_deref() == Some(head) {
            let target = resolver.resolve(&import.specifier, file)?;
            return match member {
                Some(m) => resolve_exported(facade, resolver, &target, m),
                None => Some(SymbolId::module(target)),
            };
        }
    }
    None
}

/// Resolve an exported name of `target` to its origin declaration,
/// following one hop of re-export indirection.
fn resolve_exported(
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    target: &Path,
    name: &str,
) -> Option<SymbolId> {
    // Outside the project (no facts) -> the edge is dropped.
    let module = facade.module(target)?;

    if name == "default" {
        if let Some(decl) = module.default_export() {
            return Some(SymbolId::new(target, &decl.name));
        }
        // A default export the facts don't name; fall back to the module
        // node so the file itself stays connected.
        return Some(SymbolId::module(target));
    }
    if module.declaration(name).is_some() {
        return Some(SymbolId::new(target, name));
    }

    for re in &module.reexports {
        match re.specifier.as_deref() {
            Some(spec) => {
                let Some(next) = resolver.resolve(spec, target) else {
                    continue;
                };
                for n in &re.names {
                    if n.exported == name {
                        if let Some(next_module) = facade.module(&next) {
                            if next_module.declaration(&n.origin).is_some() {
                                return Some(SymbolId::new(&next, &n.origin));
                            }
                        }
                    }
                }
                if re.star {
                    if let Some(next_module) = facade.module(&next) {
                        if next_module.declaration(name).is_some() {
                            return Some(SymbolId::new(&next, name));
                        }
                    }
                }
            }
            None => {
                // `export { local }` re-presents a binding of this file.
                for n in &re.names {
                    if n.exported == name && module.declaration(&n.origin).is_some() {
                        return Some(SymbolId::new(target, &n.origin));
                    }
                }
            }
        }
    }
    None
}

fn node_from_decl(file: &Path, decl: &Declaration) -> SymbolNode {
    let mut node = SymbolNode::new(SymbolId::new(file, &decl.name), decl.kind);
    node.pos = decl.pos;
    node.exported = decl.exported;
    node.default_export = decl.default_export;
    node.parent = decl.parent.as_ref().map(|p| SymbolId::new(file, p));
    node.decorators = decl.decorators.clone();
    node
}

/// Build the symbol graph over the candidate file set.
pub fn build_symbol_graph(
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    reach: &FileReachability,
) -> SymbolGraph {
    let mut graph = SymbolGraph::new();
    let files: Vec<&Path> = reach.candidates.iter().map(|p| p.as_path()).collect();

    // 1. Nodes: collected per file in parallel, merged at the barrier.
    let batches: Vec<Vec<SymbolNode>> = files
        .par_iter()
        .filter_map(|file| facade.module(file))
        .map(|module| {
            module
                .declarations
                .iter()
                .map(|decl| node_from_decl(&module.path, decl))
                .collect()
        })
        .collect();
    for batch in batches {
        for node in batch {
            graph.add_node(node);
        }
    }

    // 2. Outgoing edges from body references (and top-level references,
    //    which source from the `<module>` node).
    for file in &files {
        let Some(module) = facade.module(file) else {
            continue;
        };
        for decl in &module.declarations {
            let from = SymbolId::new(*file, &decl.name);
            for body_ref in &decl.body_refs {
                add_resolved_edge(
                    &mut graph, facade, resolver, reach, file, &from, &body_ref.name,
                    body_ref.kind, body_ref.pos,
                );
            }
        }
        if !module.module_refs.is_empty() {
            let from = SymbolId::module(*file);
            for body_ref in &module.module_refs {
                add_resolved_edge(
                    &mut graph, facade, resolver, reach, file, &from, &body_ref.name,
                    body_ref.kind, body_ref.pos,
                );
            }
        }
    }

    // 3. Incoming edges from find-references on top-level declarations.
    for file in &files {
        let Some(module) = facade.module(file) else {
            continue;
        };
        for decl in &module.declarations {
            if !decl.is_top_level() {
                continue;
            }
            let target = SymbolId::new(*file, &decl.name);
            let sites = match facade.find_references(file, &decl.name) {
                Ok(sites) => sites,
                Err(e) => {
                    debug!(file = %file.display(), symbol = %decl.name, error = %e,
                        "facade could not answer find_references; skipping node");
                    continue;
                }
            };
            for site in sites {
                if site.is_definition || !reach.is_candidate(&site.file) {
                    continue;
                }
                let from = match &site.container {
                    Some(container) => SymbolId::new(&site.file, container),
                    None => SymbolId::module(&site.file),
                };
                graph.add_edge(
                    from,
                    target.clone(),
                    EdgeInfo {
                        kind: site.kind,
                        file: site.file.clone(),
                        pos: site.pos,
                    },
                );
            }
        }
    }

    graph
}

#[allow(clippy::too_many_arguments)]
fn add_resolved_edge(
    graph: &mut SymbolGraph,
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    reach: &FileReachability,
    file: &Path,
    from: &SymbolId,
    name: &str,
    kind: RefKind,
    pos: crate::facade::SourcePos,
) {
    let Some(to) = resolve_ident(facade, resolver, file, name) else {
        // No guessed edges for unresolvable identifiers.
        return;
    };
    if !reach.is_candidate(&to.file) {
        return;
    }
    graph.add_edge(
        from.clone(),
        to,
        EdgeInfo {
            kind,
            file: file.to_path_buf(),
            pos,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{
        BodyRef, DeclKind, Import, MemoryFacade, ModuleFacts, NamedImport, ReExport,
        ReExportName, SourcePos,
    };
    use crate::reachability::compute_reachability;
    use std::path::PathBuf;

    fn exported(name: &str, kind: DeclKind) -> Declaration {
        let mut d = Declaration::new(name, kind);
        d.exported = true;
        d
    }

    fn build(facade: &MemoryFacade) -> SymbolGraph {
        let resolver = ModuleResolver::new(facade);
        let reach = compute_reachability(facade, &resolver, &[], Path::new("/proj"), false);
        build_symbol_graph(facade, &resolver, &reach)
    }

    #[test]
    fn test_nodes_from_declarations() {
        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/src/index.ts");
        m.declarations.push(exported("Service", DeclKind::Class));
        let mut method = Declaration::new("Service.run", DeclKind::Method);
        method.parent = Some("Service".into());
        m.declarations.push(method);
        facade.add_module(m);

        let graph = build(&facade);
        let class_id = SymbolId::new("/proj/src/index.ts", "Service");
        let method_id = SymbolId::new("/proj/src/index.ts", "Service.run");
        assert!(graph.node(&class_id).is_some());
        let method = graph.node(&method_id).unwrap();
        assert_eq!(method.parent.as_ref(), Some(&class_id));
    }

    #[test]
    fn test_cross_file_edge_through_import() {
        let mut facade = MemoryFacade::new();

        let mut util = ModuleFacts::new("/proj/src/util.ts");
        util.declarations.push(exported("helper", DeclKind::Function));
        facade.add_module(util);

        let mut index = ModuleFacts::new("/proj/src/index.ts");
        let mut import = Import::new("./util");
        import.named.push(NamedImport {
            name: "helper".into(),
            alias: None,
            type_only: false,
        });
        index.imports.push(import);
        let mut main = exported("main", DeclKind::Function);
        main.body_refs
            .push(BodyRef::new("helper", RefKind::Call, SourcePos::new(2, 3)));
        index.declarations.push(main);
        facade.add_module(index);

        let graph = build(&facade);
        let from = SymbolId::new("/proj/src/index.ts", "main");
        let to = SymbolId::new("/proj/src/util.ts", "helper");
        assert!(graph.edges.contains_key(&(from, to)));
    }

    #[test]
    fn test_one_hop_reexport_indirection() {
        let mut facade = MemoryFacade::new();

        let mut origin = ModuleFacts::new("/proj/src/impl.ts");
        origin.declarations.push(exported("real", DeclKind::Function));
        facade.add_module(origin);

        let mut barrel = ModuleFacts::new("/proj/src/index.ts");
        barrel.reexports.push(ReExport {
            specifier: Some("./impl".into()),
            names: vec![ReExportName {
                exported: "real".into(),
                origin: "real".into(),
                type_only: false,
            }],
            star: false,
            pos: SourcePos::default(),
        });
        facade.add_module(barrel);

        let mut app = ModuleFacts::new("/proj/src/main.ts");
        let mut import = Import::new("./index");
        import.named.push(NamedImport {
            name: "real".into(),
            alias: None,
            type_only: false,
        });
        app.imports.push(import);
        let mut run = exported("run", DeclKind::Function);
        run.body_refs
            .push(BodyRef::new("real", RefKind::Call, SourcePos::new(3, 1)));
        app.declarations.push(run);
        facade.add_module(app);

        let graph = build(&facade);
        let from = SymbolId::new("/proj/src/main.ts", "run");
        let to = SymbolId::new("/proj/src/impl.ts", "real");
        assert!(
            graph.edges.contains_key(&(from, to)),
            "edge should point at the origin declaration, not the barrel"
        );
    }

    #[test]
    fn test_unresolvable_identifier_skipped() {
        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/src/index.ts");
        let mut f = exported("main", DeclKind::Function);
        f.body_refs
            .push(BodyRef::new("mystery", RefKind::Call, SourcePos::new(2, 1)));
        m.declarations.push(f);
        facade.add_module(m);

        let graph = build(&facade);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_out_of_project_target_dropped() {
        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/src/index.ts");
        let mut import = Import::new("lodash");
        import.named.push(NamedImport {
            name: "merge".into(),
            alias: None,
            type_only: false,
        });
        m.imports.push(import);
        let mut f = exported("main", DeclKind::Function);
        f.body_refs
            .push(BodyRef::new("merge", RefKind::Call, SourcePos::new(2, 1)));
        m.declarations.push(f);
        facade.add_module(m);
        // lodash resolves to a path outside the candidate set.
        facade.add_resolution(
            Path::new("/proj/src/index.ts"),
            "lodash",
            "/proj/node_modules/lodash/index.js",
        );

        let graph = build(&facade);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_module_node_sources_top_level_refs() {
        let mut facade = MemoryFacade::new();
        let mut m = ModuleFacts::new("/proj/src/index.ts");
        m.declarations.push(exported("boot", DeclKind::Function));
        m.module_refs
            .push(BodyRef::new("boot", RefKind::Call, SourcePos::new(9, 1)));
        facade.add_module(m);

        let graph = build(&facade);
        let from = SymbolId::module(PathBuf::from("/proj/src/index.ts"));
        let to = SymbolId::new("/proj/src/index.ts", "boot");
        assert!(graph.edges.contains_key(&(from, to)));
    }

    #[test]
    fn test_namespace_member_access_resolves() {
        let mut facade = MemoryFacade::new();

        let mut util = ModuleFacts::new("/proj/src/util.ts");
        util.declarations.push(exported("a", DeclKind::Function));
        facade.add_module(util);

        let mut index = ModuleFacts::new("/proj/src/index.ts");
        let mut import = Import::new("./util");
        import.namespace_binding = Some("U".into());
        index.imports.push(import);
        let mut main = exported("main", DeclKind::Function);
        main.body_refs
            .push(BodyRef::new("U.a", RefKind::Call, SourcePos::new(2, 1)));
        index.declarations.push(main);
        facade.add_module(index);

        let graph = build(&facade);
        let from = SymbolId::new("/proj/src/index.ts", "main");
        let to = SymbolId::new("/proj/src/util.ts", "a");
        assert!(graph.edges.contains_key(&(from, to)));
    }
}
