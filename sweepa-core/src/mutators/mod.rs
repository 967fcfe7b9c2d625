//! The mutator pipeline: ordered graph transformation passes.
//!
//! Four phases run in order — entry-points, references, retention, marking —
//! and mutators within a phase run by ascending priority. A mutator receives
//! a context exposing the graph, the facade, the project root, the detected
//! frameworks and the configuration; adding a mutator requires no changes
//! elsewhere.

mod decorators;
mod entry_points;
mod jsx;
mod marking;

pub use decorators::DecoratorRetainer;
pub use entry_points::EntryPointRetainer;
pub use jsx::JsxReferenceBuilder;
pub use marking::UsedDeclarationMarker;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::config::SweepaConfig;
use crate::facade::CompilerFacade;
use crate::frameworks::DetectedFramework;
use crate::graph::{EdgeInfo, SymbolGraph, SymbolId};
use crate::manifest::PackageManifest;
use crate::reachability::FileReachability;
use crate::resolver::ModuleResolver;

/// Execution phase of a mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    EntryPoints,
    References,
    Retention,
    Marking,
}

/// A graph transformation pass.
pub trait Mutator {
    fn name(&self) -> &'static str;

    fn phase(&self) -> Phase;

    /// Ordering within the phase; lower runs first.
    fn priority(&self) -> i32 {
        0
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) -> Result<()>;
}

/// Everything a mutator may observe and mutate.
pub struct MutatorContext<'a> {
    pub graph: &'a mut SymbolGraph,
    pub facade: &'a dyn CompilerFacade,
    pub resolver: &'a ModuleResolver<'a>,
    pub root: &'a Path,
    pub frameworks: &'a [DetectedFramework],
    pub manifest: Option<&'a PackageManifest>,
    pub config: &'a SweepaConfig,
    pub reach: &'a FileReachability,
}

impl MutatorContext<'_> {
    pub fn mark_entry_point(&mut self, id: &SymbolId, reason: impl Into<String>) {
        self.graph.mark_entry_point(id, reason);
    }

    pub fn mark_retained(&mut self, id: &SymbolId, reason: impl Into<String>) {
        self.graph.mark_retained(id, reason);
    }

    pub fn add_edge(&mut self, from: SymbolId, to: SymbolId, info: EdgeInfo) -> bool {
        self.graph.add_edge(from, to, info)
    }

    pub fn log(&self, message: &str) {
        debug!(detail = %message, "mutator");
    }
}

/// The built-in pipeline, in declaration order (sorting happens at run time).
pub fn builtin_mutators() -> Vec<Box<dyn Mutator>> {
    vec![
        Box::new(EntryPointRetainer),
        Box::new(JsxReferenceBuilder),
        Box::new(DecoratorRetainer),
        Box::new(UsedDeclarationMarker),
    ]
}

/// Run a set of mutators in (phase, priority) order.
pub fn run_pipeline(mutators: &mut [Box<dyn Mutator>], ctx: &mut MutatorContext<'_>) -> Result<()> {
    mutators.sort_by_key(|m| (m.phase(), m.priority()));
    for mutator in mutators.iter() {
        debug!(mutator = mutator.name(), "running mutator");
        mutator.run(ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: &'static str,
        phase: Phase,
        priority: i32,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Mutator for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }
        fn phase(&self) -> Phase {
            self.phase
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn run(&self, _ctx: &mut MutatorContext<'_>) -> Result<()> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    #[test]
    fn test_pipeline_order_phase_then_priority() {
        use crate::facade::MemoryFacade;

        let facade = MemoryFacade::new();
        let resolver = ModuleResolver::new(&facade);
        let mut graph = SymbolGraph::new();
        let config = SweepaConfig::default();
        let reach = FileReachability::default();
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

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut mutators: Vec<Box<dyn Mutator>> = vec![
            Box::new(Recorder {
                name: "marking",
                phase: Phase::Marking,
                priority: 0,
                log: log.clone(),
            }),
            Box::new(Recorder {
                name: "entry-late",
                phase: Phase::EntryPoints,
                priority: 10,
                log: log.clone(),
            }),
            Box::new(Recorder {
                name: "entry-early",
                phase: Phase::EntryPoints,
                priority: -10,
                log: log.clone(),
            }),
            Box::new(Recorder {
                name: "retention",
                phase: Phase::Retention,
                priority: 0,
                log: log.clone(),
            }),
        ];

        run_pipeline(&mut mutators, &mut ctx).unwrap();
        assert_eq!(
            log.borrow().as_slice(),
            &["entry-early", "entry-late", "retention", "marking"]
        );
    }
}
