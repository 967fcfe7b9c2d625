//! Module-boundary export analysis.
//!
//! Complements the intra-project call graph with a whole-module view: which
//! named exports of each reachable module are actually imported by other
//! reachable modules, propagated through named re-exports, star re-exports
//! and default/namespace imports. Default and namespace imports are
//! conservative: they mark every export of the target as used, because
//! member access through the namespace cannot be tracked safely.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::SweepaConfig;
use crate::facade::{CompilerFacade, DeclKind, SourcePos};
use crate::frameworks::{entry_export_filter, DetectedFramework, ExportFilter};
use crate::issues::{Confidence, Issue, IssueKind};
use crate::reachability::{looks_generated, FileReachability};
use crate::resolver::ModuleResolver;

/// Gate for the analysis: off, barrel files only, or every reachable file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    Off,
    #[default]
    Barrels,
    All,
}

/// Export provenance of one reachable file.
#[derive(Debug, Clone, Default)]
pub struct ExportInfo {
    /// Names the file re-presents to importers as runtime values.
    /// Enums count as values because they also exist at runtime.
    pub value_exports: BTreeSet<String>,
    /// Names the file re-presents as types only.
    pub type_exports: BTreeSet<String>,
    /// Re-export origins: exported name -> (origin_file, origin_name) pairs.
    pub value_origins: BTreeMap<String, Vec<(PathBuf, String)>>,
    pub type_origins: BTreeMap<String, Vec<(PathBuf, String)>>,
    /// Files forwarded unconditionally via `export *`.
    pub star_targets: BTreeSet<PathBuf>,
    /// Framework entry whose exports are consumed by convention.
    pub skip_reporting: bool,
    positions: BTreeMap<String, SourcePos>,
    kinds: BTreeMap<String, DeclKind>,
}

/// Usage recorded against one file.
#[derive(Debug, Clone, Default)]
pub struct UsageInfo {
    pub used_values: BTreeSet<String>,
    pub used_types: BTreeSet<String>,
    /// A default or namespace import targets this file; every export is
    /// conservatively treated as used.
    pub uses_all: bool,
}

impl UsageInfo {
    /// Whether an export name counts as used (directly, type-only, or via
    /// the conservative `uses_all`).
    pub fn is_used(&self, name: &str) -> bool {
        self.uses_all || self.used_values.contains(name) || self.used_types.contains(name)
    }
}

/// The result of collection plus fixpoint propagation.
#[derive(Debug, Default)]
pub struct ExportAnalysis {
    pub exports: BTreeMap<PathBuf, ExportInfo>,
    pub usage: BTreeMap<PathBuf, UsageInfo>,
}

/// A barrel is recognised by basename (`index.*`) or by containing any
/// export with a module specifier.
pub fn is_barrel_file(facade: &dyn CompilerFacade, path: &Path) -> bool {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if basename.starts_with("index.") {
        return true;
    }
    facade
        .module(path)
        .is_some_and(|m| m.reexports.iter().any(|r| r.specifier.is_some()))
}

/// Collect export provenance and usage for the reachable set, then iterate
/// propagation to a fixpoint.
pub fn analyze_exports(
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    reach: &FileReachability,
    frameworks: &[DetectedFramework],
) -> ExportAnalysis {
    let mut analysis = ExportAnalysis::default();

    // 1. Collect exports per reachable file.
    for file in &reach.reachable {
        let Some(module) = facade.module(file) else {
            continue;
        };
        let mut info = ExportInfo::default();

        for decl in &module.declarations {
            if !decl.is_top_level() || !decl.exported {
                continue;
            }
            let name = if decl.default_export {
                "default".to_string()
            } else {
                decl.name.clone()
            };
            if decl.kind.is_type_only() {
                info.type_exports.insert(name.clone());
            } else {
                info.value_exports.insert(name.clone());
            }
            info.positions.insert(name.clone(), decl.pos);
            info.kinds.insert(name, decl.kind);
        }

        for re in &module.reexports {
            let target = re
                .specifier
                .as_deref()
                .and_then(|spec| resolver.resolve(spec, file));
            if re.star {
                if let Some(target) = &target {
                    info.star_targets.insert(target.clone());
                }
                continue;
            }
            for n in &re.names {
                let (exports, origins) = if n.type_only {
                    (&mut info.type_exports, &mut info.type_origins)
                } else {
                    (&mut info.value_exports, &mut info.value_origins)
                };
                exports.insert(n.exported.clone());
                info.positions.entry(n.exported.clone()).or_insert(re.pos);
                if let Some(target) = &target {
                    // The defining declaration lives in another project file;
                    // record the origin so usage can chain back to it.
                    origins
                        .entry(n.exported.clone())
                        .or_default()
                        .push((target.clone(), n.origin.clone()));
                } else if let Some(decl) = module.declaration(&n.origin) {
                    // `export { local }`: classification follows the local
                    // declaration's kind.
                    info.positions.insert(n.exported.clone(), decl.pos);
                    info.kinds.insert(n.exported.clone(), decl.kind);
                }
            }
        }

        let rel = reach.relative(file);
        match entry_export_filter(frameworks, &rel) {
            Some(ExportFilter::All) => info.skip_reporting = true,
            Some(ExportFilter::Named(names)) => {
                let usage = analysis.usage.entry(file.clone()).or_default();
                usage.used_values.extend(names.iter().cloned());
                usage.used_types.extend(names.iter().cloned());
            }
            None => {}
        }

        analysis.exports.insert(file.clone(), info);
    }

    // 2. Collect usage from every reachable importer.
    for file in &reach.reachable {
        let Some(module) = facade.module(file) else {
            continue;
        };
        for import in &module.imports {
            let Some(target) = resolver.resolve(&import.specifier, file) else {
                continue;
            };
            if !reach.is_candidate(&target) {
                continue;
            }
            let usage = analysis.usage.entry(target.clone()).or_default();
            for named in &import.named {
                if named.type_only || import.type_only {
                    usage.used_types.insert(named.name.clone());
                } else {
                    usage.used_values.insert(named.name.clone());
                }
            }
            if import.default_binding.is_some() || import.namespace_binding.is_some() {
                usage.uses_all = true;
            }
        }
    }

    // 3. Fixpoint propagation.
    propagate(&mut analysis);
    analysis
}

/// Iterate propagation until no set changes. Sets only grow, so the loop
/// terminates; re-running after the fixpoint is a no-op.
fn propagate(analysis: &mut ExportAnalysis) {
    let files: Vec<PathBuf> = analysis
        .exports
        .keys()
        .chain(analysis.usage.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    loop {
        let mut pending_values: Vec<(PathBuf, String)> = Vec::new();
        let mut pending_types: Vec<(PathBuf, String)> = Vec::new();
        let mut pending_all: Vec<PathBuf> = Vec::new();

        for file in &files {
            let Some(usage) = analysis.usage.get(file) else {
                continue;
            };
            let exports = analysis.exports.get(file);

            if usage.uses_all {
                if let Some(exports) = exports {
                    // uses_all covers the star targets as well: a namespace
                    // of this file reaches every forwarded name.
                    for target in &exports.star_targets {
                        pending_all.push(target.clone());
                    }
                    for name in &exports.value_exports {
                        pending_values.push((file.clone(), name.clone()));
                    }
                    for name in &exports.type_exports {
                        pending_types.push((file.clone(), name.clone()));
                    }
                }
            }

            let Some(exports) = exports else {
                continue;
            };
            for name in &usage.used_values {
                if let Some(origins) = exports.value_origins.get(name) {
                    for (origin_file, origin_name) in origins {
                        pending_values.push((origin_file.clone(), origin_name.clone()));
                    }
                }
                if !exports.value_exports.contains(name) {
                    // The name is only exported because of a star forward;
                    // mark it used in the star targets. A target that does
                    // not define it chases its own stars next round.
                    for target in &exports.star_targets {
                        if analysis.exports.contains_key(target) {
                            pending_values.push((target.clone(), name.clone()));
                        }
                    }
                }
            }
            for name in &usage.used_types {
                if let Some(origins) = exports.type_origins.get(name) {
                    for (origin_file, origin_name) in origins {
                        pending_types.push((origin_file.clone(), origin_name.clone()));
                    }
                }
                if let Some(origins) = exports.value_origins.get(name) {
                    // Type-only imports of a value re-export still chain.
                    for (origin_file, origin_name) in origins {
                        pending_types.push((origin_file.clone(), origin_name.clone()));
                    }
                }
                if !exports.type_exports.contains(name) && !exports.value_exports.contains(name) {
                    for target in &exports.star_targets {
                        if analysis.exports.contains_key(target) {
                            pending_types.push((target.clone(), name.clone()));
                        }
                    }
                }
            }
        }

        let mut changed = false;
        for (file, name) in pending_values {
            let usage = analysis.usage.entry(file).or_default();
            changed |= usage.used_values.insert(name);
        }
        for (file, name) in pending_types {
            let usage = analysis.usage.entry(file).or_default();
            changed |= usage.used_types.insert(name);
        }
        for file in pending_all {
            let usage = analysis.usage.entry(file).or_default();
            if !usage.uses_all {
                usage.uses_all = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Emit `unused-exported` / `unused-exported-type` issues for the files the
/// configured mode covers.
pub fn report_unused_exports(
    facade: &dyn CompilerFacade,
    analysis: &ExportAnalysis,
    reach: &FileReachability,
    config: &SweepaConfig,
) -> Vec<Issue> {
    let empty = UsageInfo::default();
    let mut issues = Vec::new();

    for (file, exports) in &analysis.exports {
        if exports.skip_reporting {
            continue;
        }
        let rel = reach.relative(file);
        let mode = config.export_mode_for(&rel);
        let in_scope = match mode {
            ExportMode::Off => false,
            ExportMode::Barrels => is_barrel_file(facade, file),
            ExportMode::All => true,
        };
        if !in_scope {
            continue;
        }
        if config.unused_exported_ignore_generated && looks_generated(&rel) {
            continue;
        }

        let usage = analysis.usage.get(file).unwrap_or(&empty);
        let dynamic = facade.module(file).is_some_and(|m| m.dynamic_access);
        let confidence = if dynamic {
            Confidence::Low
        } else {
            Confidence::High
        };

        for name in &exports.value_exports {
            if usage.is_used(name) {
                continue;
            }
            let pos = exports.positions.get(name).copied().unwrap_or_default();
            let mut issue = Issue::new(IssueKind::UnusedExported, name, file, pos.line, pos.column)
                .with_confidence(confidence)
                .with_message(format!("export '{}' is never imported", name));
            if let Some(kind) = exports.kinds.get(name) {
                issue = issue.with_symbol_kind(*kind);
            }
            issues.push(issue);
        }
        for name in &exports.type_exports {
            if usage.is_used(name) {
                continue;
            }
            let pos = exports.positions.get(name).copied().unwrap_or_default();
            let mut issue =
                Issue::new(IssueKind::UnusedExportedType, name, file, pos.line, pos.column)
                    .with_confidence(confidence)
                    .with_message(format!("exported type '{}' is never imported", name));
            if let Some(kind) = exports.kinds.get(name) {
                issue = issue.with_symbol_kind(*kind);
            }
            issues.push(issue);
        }
    }
    issues
}
