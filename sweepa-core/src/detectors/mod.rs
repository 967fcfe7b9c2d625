//! The detector suite: pure functions from compiled analysis inputs to
//! issues. Each detector lives in its own file and is additive; the
//! aggregate runner concatenates their output in a fixed order (final
//! ordering is applied later by the analyzer).

mod properties;
mod redundant_exports;
mod unused_enum_cases;
mod unused_exports;
mod unused_files;
mod unused_imports;
mod unused_methods;
mod unused_params;
mod unused_types;

pub use properties::detect_property_issues;
pub use redundant_exports::detect_redundant_exports;
pub use unused_enum_cases::detect_unused_enum_cases;
pub use unused_exports::detect_unused_exports;
pub use unused_files::detect_unused_files;
pub use unused_imports::detect_unused_imports;
pub use unused_methods::detect_unused_methods;
pub use unused_params::detect_unused_params;
pub use unused_types::detect_unused_types;

use std::path::PathBuf;

use crate::exports::ExportAnalysis;
use crate::facade::CompilerFacade;
use crate::graph::SymbolGraph;
use crate::issues::Issue;
use crate::reachability::FileReachability;

/// Shared inputs of the graph-backed detectors.
pub struct DetectorContext<'a> {
    pub facade: &'a dyn CompilerFacade,
    pub graph: &'a SymbolGraph,
    pub reach: &'a FileReachability,
    /// Directories of every manifest in the tree (package boundaries).
    pub manifest_dirs: &'a [PathBuf],
}

impl DetectorContext<'_> {
    /// Whether the file shows dynamic access patterns (confidence drops to
    /// low for issues in such files).
    pub fn is_dynamic(&self, file: &std::path::Path) -> bool {
        self.facade.module(file).is_some_and(|m| m.dynamic_access)
    }
}

/// Run every graph-backed detector.
///
/// `export_usage` carries the module-boundary usage sets; the graph-mode
/// export detector honours their namespace/default-import conservatism.
pub fn run_detectors(ctx: &DetectorContext<'_>, export_usage: Option<&ExportAnalysis>) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(detect_unused_files(ctx));
    issues.extend(detect_unused_exports(ctx, export_usage));
    issues.extend(detect_unused_types(ctx));
    issues.extend(detect_unused_methods(ctx));
    issues.extend(detect_unused_params(ctx));
    issues.extend(detect_unused_imports(ctx));
    issues.extend(detect_unused_enum_cases(ctx));
    issues.extend(detect_property_issues(ctx));
    issues.extend(detect_redundant_exports(ctx));
    issues
}
