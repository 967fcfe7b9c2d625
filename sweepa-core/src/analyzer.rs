//! Fluent analysis API running the full pipeline.
//!
//! ```rust,ignore
//! use sweepa_core::prelude::*;
//!
//! let report = Sweepa::new("/path/to/project", &facade)
//!     .load_config()?
//!     .analyze()?;
//!
//! for issue in &report.issues {
//!     println!("{}: {}", issue.kind, issue.message);
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::{load_config, SweepaConfig};
use crate::dependencies::analyze_dependencies;
use crate::detectors::{run_detectors, DetectorContext};
use crate::exports::{analyze_exports, report_unused_exports};
use crate::facade::CompilerFacade;
use crate::frameworks::{FrameworkDetector, FrameworkRegistry};
use crate::graph_builder::build_symbol_graph;
use crate::ignores::apply_ignores;
use crate::issues::{dedupe_issues, sort_issues, Issue, IssueKind};
use crate::manifest::{find_manifests, PackageManifest};
use crate::mutators::{builtin_mutators, run_pipeline, Mutator, MutatorContext};
use crate::reachability::compute_reachability;
use crate::resolver::ModuleResolver;

/// Builder for configuring and running one analysis invocation.
pub struct Sweepa<'f> {
    root: PathBuf,
    facade: &'f dyn CompilerFacade,
    config: SweepaConfig,
    registry: FrameworkRegistry,
    strict_config: bool,
    extra_mutators: Vec<Box<dyn Mutator>>,
}

impl<'f> Sweepa<'f> {
    /// Create an analysis builder for the given project root.
    pub fn new(root: impl Into<PathBuf>, facade: &'f dyn CompilerFacade) -> Self {
        Self {
            root: root.into(),
            facade,
            config: SweepaConfig::default(),
            registry: FrameworkRegistry::with_builtins(),
            strict_config: false,
            extra_mutators: Vec::new(),
        }
    }

    /// Use an explicit configuration instead of reading sweepa.toml.
    pub fn with_config(mut self, config: SweepaConfig) -> Self {
        self.config = config;
        self
    }

    /// Treat malformed configuration as fatal.
    pub fn strict_config(mut self, enabled: bool) -> Self {
        self.strict_config = enabled;
        self
    }

    /// Read sweepa.toml from the project root. Malformed configuration is
    /// fatal in strict mode; otherwise it is warned about and the defaults
    /// are used.
    pub fn load_config(mut self) -> Result<Self> {
        match load_config(&self.root) {
            Ok(Some(config)) => self.config = config,
            Ok(None) => {}
            Err(e) if self.strict_config => return Err(e),
            Err(e) => warn!(error = %e, "invalid sweepa.toml, using defaults"),
        }
        Ok(self)
    }

    /// Override the module-boundary export analysis mode, keeping the rest
    /// of the loaded configuration.
    pub fn with_export_mode(mut self, mode: crate::exports::ExportMode) -> Self {
        self.config.unused_exported = mode;
        self
    }

    /// Register an additional framework detector.
    pub fn register_framework(mut self, detector: Box<dyn FrameworkDetector>) -> Self {
        self.registry.register(detector);
        self
    }

    /// Register an additional mutator pass.
    pub fn register_mutator(mut self, mutator: Box<dyn Mutator>) -> Self {
        self.extra_mutators.push(mutator);
        self
    }

    /// Run the analysis and return the ordered issue list with statistics.
    pub fn analyze(mut self) -> Result<AnalysisReport> {
        // 1. Package manifest (dependency analysis is skipped without one).
        let manifest_path = self.root.join("package.json");
        let manifest = match PackageManifest::load(&manifest_path) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!(error = %e, "no readable package manifest; skipping dependency analysis");
                None
            }
        };

        // 2. Framework detection (pure manifest inspection).
        let frameworks = match &manifest {
            Some(manifest) => self.registry.detect_all(&self.root, manifest),
            None => Vec::new(),
        };
        for framework in &frameworks {
            debug!(framework = framework.name, version = ?framework.version, "detected framework");
        }

        // 3. File reachability.
        let resolver = ModuleResolver::new(self.facade);
        let reach = compute_reachability(
            self.facade,
            &resolver,
            &frameworks,
            &self.root,
            self.config.ignore_generated,
        );

        // 4. Symbol graph.
        let mut graph = build_symbol_graph(self.facade, &resolver, &reach);

        // 5. Mutator pipeline.
        let mut mutators = builtin_mutators();
        mutators.append(&mut self.extra_mutators);
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: self.facade,
            resolver: &resolver,
            root: &self.root,
            frameworks: &frameworks,
            manifest: manifest.as_ref(),
            config: &self.config,
            reach: &reach,
        };
        run_pipeline(&mut mutators, &mut ctx).context("mutator pipeline failed")?;

        let mut issues: Vec<Issue> = Vec::new();

        // 6. Module-boundary export analysis.
        let export_analysis = analyze_exports(self.facade, &resolver, &reach, &frameworks);
        issues.extend(report_unused_exports(
            self.facade,
            &export_analysis,
            &reach,
            &self.config,
        ));

        // 7. Dependency analysis.
        if let Some(manifest) = &manifest {
            let dependency_analysis =
                analyze_dependencies(self.facade, &resolver, &reach, &manifest_path, manifest);
            issues.extend(dependency_analysis.issues);
        }

        // 8. Detector suite.
        let manifest_dirs: Vec<PathBuf> = find_manifests(&self.root)
            .iter()
            .filter_map(|m| m.parent().map(Path::to_path_buf))
            .collect();
        let detector_ctx = DetectorContext {
            facade: self.facade,
            graph: &graph,
            reach: &reach,
            manifest_dirs: &manifest_dirs,
        };
        issues.extend(run_detectors(&detector_ctx, Some(&export_analysis)));

        // 9. Suppression, dedup, canonical order.
        let issues = apply_ignores(issues, self.facade, &self.config, &self.root);
        let mut issues = dedupe_issues(issues);
        sort_issues(&mut issues, &self.root);

        Ok(AnalysisReport {
            root: self.root,
            total_files: reach.candidates.len(),
            reachable_files: reach.reachable.len(),
            entry_files: reach.entries.len(),
            symbol_count: graph.node_count(),
            edge_count: graph.edge_count(),
            frameworks: frameworks.iter().map(|f| f.name.to_string()).collect(),
            issues,
        })
    }
}

/// Result of one analysis invocation.
#[derive(Debug)]
pub struct AnalysisReport {
    pub root: PathBuf,
    pub total_files: usize,
    pub reachable_files: usize,
    pub entry_files: usize,
    pub symbol_count: usize,
    pub edge_count: usize,
    pub frameworks: Vec<String>,
    /// The final, canonically ordered issue list.
    pub issues: Vec<Issue>,
}

impl AnalysisReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issue counts per kind.
    pub fn count_by_kind(&self) -> BTreeMap<IssueKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Issues of one kind, in canonical order.
    pub fn issues_of_kind(&self, kind: IssueKind) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }
}
