//! sweepa-core: reachability-based dead code and dependency analysis for
//! module-based source trees.
//!
//! The engine builds a symbol-level reference graph from a compiler facade,
//! runs a phased pipeline of graph transformations that encodes framework
//! and language retention semantics, computes reachability from entry
//! points, and derives a taxonomy of issues from the result: unused files,
//! unused exported symbols and types, unused dependencies, unresolved
//! imports, misplaced dependencies, and redundant exports.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Framework detection** - Manifest-driven plug-in detectors
//! 2. **File reachability** - Entry files plus everything they import
//! 3. **Graph building** - Declarations as nodes, references as edges
//! 4. **Mutator pipeline** - Entry points, JSX edges, retention, marking
//! 5. **Export analysis** - Module-boundary used-export propagation
//! 6. **Dependency analysis** - Manifest hygiene
//! 7. **Detectors** - Issue derivation
//! 8. **Suppression** - In-source directives and configuration ignores
//!
//! The engine is deliberately conservative where the compiler's information
//! is ambiguous: namespace and default imports mark every export of their
//! target as used, dynamic access drops confidence instead of guessing, and
//! retained (decorated) symbols are never reported.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use sweepa_core::prelude::*;
//!
//! let facade = MemoryFacade::from_json(path, &snapshot_text)?;
//! let report = Sweepa::new("/path/to/project", &facade)
//!     .load_config()?
//!     .analyze()?;
//!
//! for issue in &report.issues {
//!     println!("{}", issue.message);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`facade`]: The compiler facade interface and the in-memory program model
//! - [`specifier`]: Import specifier classification
//! - [`resolver`]: Module resolution with memoization
//! - [`manifest`]: Package manifest model and discovery
//! - [`frameworks`]: Pluggable framework detectors and glob patterns
//! - [`reachability`]: File-level reachability from entry files
//! - [`graph`] / [`graph_builder`]: The symbol reference graph
//! - [`mutators`]: The phased graph transformation pipeline
//! - [`exports`]: Module-boundary export analysis
//! - [`dependencies`]: Dependency classification and hygiene
//! - [`detectors`]: The issue detector suite
//! - [`ignores`]: In-source directives and configured suppression
//! - [`baseline`]: Baseline snapshot and filtering
//! - [`fixers`]: Safe manifest fixers
//! - [`analyzer`]: The fluent orchestration API
//! - [`error`]: Typed error handling

pub mod analyzer;
pub mod baseline;
pub mod config;
pub mod dependencies;
pub mod detectors;
pub mod error;
pub mod exports;
pub mod facade;
pub mod fixers;
pub mod frameworks;
pub mod graph;
pub mod graph_builder;
pub mod ignores;
pub mod issues;
pub mod logging;
pub mod manifest;
pub mod mutators;
pub mod prelude;
pub mod reachability;
pub mod report;
pub mod resolver;
pub mod specifier;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{IoResultExt, SweepaError, SweepaResult};

// Analysis API
pub use analyzer::{AnalysisReport, Sweepa};

// Facade surface
pub use facade::{
    BodyRef, CompilerFacade, DeclKind, Declaration, Import, JsxTag, MemoryFacade, ModuleFacts,
    NamedImport, ParamBinding, ParamPattern, ProgramSnapshot, ReExport, ReExportName, RefKind,
    ReferenceSite, SourcePos,
};

// Issue model
pub use issues::{dedupe_issues, sort_issues, Confidence, Issue, IssueKind, SectionChange};

// Configuration
pub use config::{load_config, SweepaConfig, WorkspaceOverride};

// Graph model
pub use graph::{EdgeInfo, SymbolGraph, SymbolId, SymbolNode, MODULE_SYMBOL};
pub use graph_builder::build_symbol_graph;

// Reachability
pub use reachability::{compute_reachability, FileReachability};

// Resolution and classification
pub use resolver::ModuleResolver;
pub use specifier::{classify, is_builtin, package_name, SpecifierKind};

// Manifest
pub use manifest::{find_manifests, package_boundary, DependencySection, PackageManifest};

// Frameworks
pub use frameworks::{
    DetectedFramework, EntryPattern, ExportFilter, FrameworkConfig, FrameworkDetector,
    FrameworkRegistry, GlobPattern,
};

// Mutator pipeline
pub use mutators::{builtin_mutators, run_pipeline, Mutator, MutatorContext, Phase};

// Export analysis
pub use exports::{analyze_exports, report_unused_exports, ExportAnalysis, ExportMode};

// Dependency analysis
pub use dependencies::{analyze_dependencies, DependencyAnalysis, PackageRecord};

// Baseline protocol
pub use baseline::{
    create_baseline, filter_issues, load_baseline, save_baseline, Baseline, BaselineIssue,
};

// Fixers
pub use fixers::{move_dependencies, remove_dependencies, FixResult};

// Reporting
pub use report::{print_json, print_plain, to_json};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};
