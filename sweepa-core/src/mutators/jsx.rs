//! Phase 2: JSX reference edges.
//!
//! Components referenced only as markup (`<Hero/>`) have no call-expression
//! reference, so the graph builder never sees them. This pass adds a
//! `jsx_element` edge from the containing declaration to the component
//! symbol for every upper-case tag; lower-case tags are host elements and
//! are skipped.

use anyhow::Result;

use super::{Mutator, MutatorContext, Phase};
use crate::facade::RefKind;
use crate::graph::{EdgeInfo, SymbolId};
use crate::graph_builder::resolve_ident;

pub struct JsxReferenceBuilder;

fn is_component_tag(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

impl Mutator for JsxReferenceBuilder {
    fn name(&self) -> &'static str {
        "jsx-reference-builder"
    }

    fn phase(&self) -> Phase {
        Phase::References
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) -> Result<()> {
        for file in ctx.reach.candidates.clone() {
            let Some(module) = ctx.facade.module(&file) else {
                continue;
            };

            let mut edges: Vec<(SymbolId, SymbolId, EdgeInfo)> = Vec::new();
            for decl in &module.declarations {
                let from = SymbolId::new(&file, &decl.name);
                for tag in &decl.jsx_tags {
                    if !is_component_tag(&tag.name) {
                        continue;
                    }
                    // Local components first, otherwise through the imports.
                    let Some(to) = resolve_ident(ctx.facade, ctx.resolver, &file, &tag.name)
                    else {
                        continue;
                    };
                    if !ctx.reach.is_candidate(&to.file) {
                        continue;
                    }
                    edges.push((
                        from.clone(),
                        to,
                        EdgeInfo {
                            kind: RefKind::JsxElement,
                            file: file.clone(),
                            pos: tag.pos,
                        },
                    ));
                }
            }
            for tag in &module.module_jsx {
                if !is_component_tag(&tag.name) {
                    continue;
                }
                let Some(to) = resolve_ident(ctx.facade, ctx.resolver, &file, &tag.name) else {
                    continue;
                };
                if !ctx.reach.is_candidate(&to.file) {
                    continue;
                }
                edges.push((
                    SymbolId::module(&file),
                    to,
                    EdgeInfo {
                        kind: RefKind::JsxElement,
                        file: file.clone(),
                        pos: tag.pos,
                    },
                ));
            }

            for (from, to, info) in edges {
                ctx.add_edge(from, to, info);
            }
        }
        Ok(())
    }
}
