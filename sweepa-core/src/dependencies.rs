//! Dependency analysis over the package manifest.
//!
//! Classifies every listed package as used-in-production,
//! used-in-development, unlisted, unused or misplaced, and reports
//! unresolved relative imports. Usage is gathered from the reachable file
//! set plus the development entries (tests, scripts, tool configuration),
//! from package scripts, from stylesheet `@import` lines, and from a small
//! table of explicit type-package heuristics.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::facade::CompilerFacade;
use crate::issues::{Confidence, Issue, IssueKind, SectionChange};
use crate::manifest::{DependencySection, PackageManifest};
use crate::reachability::FileReachability;
use crate::resolver::ModuleResolver;
use crate::specifier::{classify, package_name, SpecifierKind};

/// Recorded usage of one package.
#[derive(Debug, Clone, Default)]
pub struct PackageRecord {
    pub used_in_production: bool,
    pub used_in_development: bool,
    pub by_files: BTreeSet<PathBuf>,
}

/// Result of the dependency pass.
#[derive(Debug, Default)]
pub struct DependencyAnalysis {
    pub records: BTreeMap<String, PackageRecord>,
    /// Some file imported a runtime builtin (feeds the `@types/node`
    /// heuristic).
    pub builtins_used: bool,
    pub issues: Vec<Issue>,
}

/// Script runners and wrappers dropped during script tokenization.
const SCRIPT_RUNNERS: &[&str] = &["npm", "npx", "pnpm", "yarn", "bun", "node", "env", "exec", "run"];

/// Binary name -> package name, where the two differ.
const BIN_ALIASES: &[(&str, &str)] = &[("tsc", "typescript"), ("sb", "storybook")];

const STYLESHEET_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less"];

/// Development classification of a using file.
pub fn is_development_file(relative_path: &str) -> bool {
    let basename = relative_path.rsplit('/').next().unwrap_or(relative_path);
    if basename.contains(".config.") || basename.contains(".test.") || basename.contains(".spec.")
    {
        return true;
    }
    relative_path
        .split('/')
        .any(|segment| matches!(segment, "scripts" | "bin" | "__tests__" | "tests"))
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext))
}

fn under_dependency_root(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == "node_modules")
}

fn stylesheet_import_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"@import\s+(?:url\()?["']([^"']+)["']"#).expect("hardcoded regex is valid")
    })
}

/// Non-relative packages imported by a stylesheet's `@import` lines.
fn stylesheet_packages(text: &str) -> Vec<String> {
    stylesheet_import_regex()
        .captures_iter(text)
        .filter_map(|c| {
            let spec = c.get(1)?.as_str();
            let spec = spec.strip_prefix('~').unwrap_or(spec);
            if spec.starts_with('.') || spec.starts_with('/') {
                return None;
            }
            package_name(spec)
        })
        .collect()
}

/// Tool packages referenced by a package script. Env assignments and known
/// runners are dropped; the first remaining token of each command is the
/// tool, mapped through the alias table.
fn script_packages(script: &str) -> Vec<String> {
    let mut packages = Vec::new();
    for command in script.split(|c| c == '&' || c == ';' || c == '|') {
        let tool = command
            .split_whitespace()
            .find(|token| {
                !token.is_empty()
                    && !token.contains('=')
                    && !token.starts_with('-')
                    && !SCRIPT_RUNNERS.contains(token)
            });
        if let Some(tool) = tool {
            let package = BIN_ALIASES
                .iter()
                .find(|(bin, _)| *bin == tool)
                .map(|(_, pkg)| pkg.to_string())
                .unwrap_or_else(|| tool.to_string());
            packages.push(package);
        }
    }
    packages
}

/// The package a `@types/*` entry provides declarations for.
/// `@types/scope__name` maps back to `@scope/name`.
fn type_package_base(name: &str) -> Option<String> {
    let rest = name.strip_prefix("@types/")?;
    if let Some((scope, pkg)) = rest.split_once("__") {
        return Some(format!("@{}/{}", scope, pkg));
    }
    Some(rest.to_string())
}

/// Run the dependency analysis against one manifest.
pub fn analyze_dependencies(
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    reach: &FileReachability,
    manifest_path: &Path,
    manifest: &PackageManifest,
) -> DependencyAnalysis {
    let mut analysis = DependencyAnalysis::default();

    // Usage set: reachable files plus development entries that nothing
    // imports (test files, scripts, tool configuration).
    let mut files: BTreeSet<&PathBuf> = reach.reachable.iter().collect();
    for file in &reach.candidates {
        if is_development_file(&reach.relative(file)) {
            files.insert(file);
        }
    }

    for file in files {
        let Some(module) = facade.module(file) else {
            continue;
        };
        let rel = reach.relative(file);
        let is_dev = is_development_file(&rel);

        for (specifier, pos) in module.specifiers() {
            match classify(specifier) {
                SpecifierKind::Builtin => {
                    analysis.builtins_used = true;
                }
                SpecifierKind::Path => {
                    match resolver.resolve(specifier, file) {
                        Some(resolved) => {
                            if is_stylesheet(&resolved) {
                                if let Some(text) = facade.source_text(&resolved) {
                                    for package in stylesheet_packages(text) {
                                        record(&mut analysis.records, &package, false, file);
                                    }
                                }
                            }
                        }
                        None => {
                            if specifier.starts_with('.') {
                                analysis.issues.push(
                                    Issue::new(
                                        IssueKind::UnresolvedImport,
                                        specifier,
                                        file,
                                        pos.line,
                                        pos.column,
                                    )
                                    .with_message(format!(
                                        "import '{}' does not resolve",
                                        specifier
                                    )),
                                );
                            }
                        }
                    }
                }
                SpecifierKind::Package => {
                    let resolved = resolver.resolve(specifier, file);
                    let Some(package) = package_name(specifier) else {
                        // Scheme-prefixed specifiers (`virtual:plugin`) are
                        // not package names; unresolved ones are reported.
                        if resolved.is_none() {
                            analysis.issues.push(
                                Issue::new(
                                    IssueKind::UnresolvedImport,
                                    specifier,
                                    file,
                                    pos.line,
                                    pos.column,
                                )
                                .with_message(format!(
                                    "import '{}' does not resolve",
                                    specifier
                                )),
                            );
                        }
                        continue;
                    };
                    if let Some(resolved) = resolved {
                        if !under_dependency_root(&resolved) {
                            // Resolves to a project file (path alias); not a
                            // dependency usage.
                            continue;
                        }
                    }
                    record(&mut analysis.records, &package, is_dev, file);
                }
            }
        }
    }

    // Package scripts count as development usage of the tools they invoke.
    for script in manifest.scripts.values() {
        for package in script_packages(script) {
            if manifest.is_listed(&package) {
                record(&mut analysis.records, &package, true, &manifest_path.to_path_buf());
            }
        }
    }

    // Explicit type-package heuristics.
    let listed: Vec<String> = manifest
        .listed_packages()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in &listed {
        let Some(base) = type_package_base(name) else {
            continue;
        };
        let base_used = if base == "node" {
            analysis.builtins_used
        } else {
            analysis.records.contains_key(&base)
        };
        if base_used {
            record(&mut analysis.records, name, true, &manifest_path.to_path_buf());
        }
    }

    // Issues.
    let listed_set: BTreeSet<&str> = listed.iter().map(|s| s.as_str()).collect();
    for (package, usage) in &analysis.records {
        if !listed_set.contains(package.as_str()) {
            analysis.issues.push(
                Issue::new(IssueKind::UnlistedDependency, package, manifest_path, 1, 1)
                    .with_message(format!(
                        "package '{}' is used but not listed in the manifest",
                        package
                    )),
            );
            continue;
        }

        let sections = manifest.sections_of(package);
        let in_production = sections.iter().any(|s| {
            matches!(
                s,
                DependencySection::Production | DependencySection::Peer | DependencySection::Optional
            )
        });
        let in_development = sections.contains(&DependencySection::Development);

        if usage.used_in_production && !in_production && in_development {
            analysis.issues.push(
                Issue::new(IssueKind::MisplacedDependency, package, manifest_path, 1, 1)
                    .with_message(format!(
                        "package '{}' is used in production but listed in devDependencies",
                        package
                    ))
                    .with_context(SectionChange {
                        current_section: DependencySection::Development,
                        recommended_section: DependencySection::Production,
                    }),
            );
        } else if usage.used_in_development
            && !usage.used_in_production
            && in_production
            && !in_development
        {
            analysis.issues.push(
                Issue::new(IssueKind::MisplacedDependency, package, manifest_path, 1, 1)
                    .with_confidence(Confidence::Medium)
                    .with_message(format!(
                        "package '{}' is only used in development but listed in dependencies",
                        package
                    ))
                    .with_context(SectionChange {
                        current_section: DependencySection::Production,
                        recommended_section: DependencySection::Development,
                    }),
            );
        }
    }

    for package in &listed {
        if !analysis.records.contains_key(package) {
            analysis.issues.push(
                Issue::new(IssueKind::UnusedDependency, package, manifest_path, 1, 1)
                    .with_message(format!("package '{}' is listed but never used", package)),
            );
        }
    }

    analysis
}

fn record(
    records: &mut BTreeMap<String, PackageRecord>,
    package: &str,
    development: bool,
    file: &PathBuf,
) {
    let entry = records.entry(package.to_string()).or_default();
    if development {
        entry.used_in_development = true;
    } else {
        entry.used_in_production = true;
    }
    entry.by_files.insert(file.clone());
}
