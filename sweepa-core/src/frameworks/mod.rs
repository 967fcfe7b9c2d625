//! Framework registry: pluggable detectors contributing entry-file patterns,
//! per-pattern used-export sets, ignore patterns and retention decorators.
//!
//! A detector inspects the package manifest only; detection never reads
//! source files. The registry aggregates all detected frameworks' configs as
//! unions, so adding a detector requires no changes elsewhere.

pub mod patterns;

mod drizzle;
mod nest;
mod next;
mod vitest;

use std::collections::BTreeSet;
use std::path::Path;

use crate::manifest::PackageManifest;
pub use patterns::GlobPattern;

pub use drizzle::DrizzleDetector;
pub use nest::NestDetector;
pub use next::NextDetector;
pub use vitest::VitestDetector;

/// Which exports of a matching entry file the framework consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFilter {
    /// Every export is used by convention (skip boundary reporting).
    All,
    /// Only the listed convention names are used; other exports are still
    /// reportable.
    Named(BTreeSet<String>),
}

impl ExportFilter {
    pub fn named(names: &[&str]) -> Self {
        Self::Named(names.iter().map(|s| s.to_string()).collect())
    }

    /// Merge two filters; `All` absorbs everything.
    pub fn merge(self, other: ExportFilter) -> ExportFilter {
        match (self, other) {
            (Self::All, _) | (_, Self::All) => Self::All,
            (Self::Named(mut a), Self::Named(b)) => {
                a.extend(b);
                Self::Named(a)
            }
        }
    }
}

/// One entry-file pattern contributed by a framework.
#[derive(Debug, Clone)]
pub struct EntryPattern {
    pub pattern: GlobPattern,
    pub used_exports: ExportFilter,
}

impl EntryPattern {
    pub fn new(pattern: GlobPattern, used_exports: ExportFilter) -> Self {
        Self {
            pattern,
            used_exports,
        }
    }
}

/// The full configuration contributed by one detected framework.
#[derive(Debug, Clone, Default)]
pub struct FrameworkConfig {
    pub entry_patterns: Vec<EntryPattern>,
    pub ignore_patterns: Vec<GlobPattern>,
    pub retain_decorators: BTreeSet<String>,
}

/// A framework found in the project manifest.
#[derive(Debug, Clone)]
pub struct DetectedFramework {
    pub name: &'static str,
    pub version: Option<String>,
    pub config: FrameworkConfig,
}

/// A pluggable framework detector.
pub trait FrameworkDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Purely a manifest inspection; `None` when the framework is absent.
    fn detect(&self, root: &Path, manifest: &PackageManifest) -> Option<DetectedFramework>;
}

/// The set of registered detectors.
pub struct FrameworkRegistry {
    detectors: Vec<Box<dyn FrameworkDetector>>,
}

impl FrameworkRegistry {
    /// Empty registry (no built-ins).
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Registry pre-loaded with the built-in detectors.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(VitestDetector));
        registry.register(Box::new(NextDetector));
        registry.register(Box::new(NestDetector));
        registry.register(Box::new(DrizzleDetector));
        registry
    }

    /// Add a detector. Detectors are additive; order only affects the order
    /// of the detected list.
    pub fn register(&mut self, detector: Box<dyn FrameworkDetector>) {
        self.detectors.push(detector);
    }

    /// Run every detector against the manifest.
    pub fn detect_all(&self, root: &Path, manifest: &PackageManifest) -> Vec<DetectedFramework> {
        self.detectors
            .iter()
            .filter_map(|d| d.detect(root, manifest))
            .collect()
    }
}

impl Default for FrameworkRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// The merged export filter for a relative path, across every matching entry
/// pattern of every detected framework. `None` when no pattern matches.
pub fn entry_export_filter(
    frameworks: &[DetectedFramework],
    relative_path: &str,
) -> Option<ExportFilter> {
    let mut merged: Option<ExportFilter> = None;
    for framework in frameworks {
        for entry in &framework.config.entry_patterns {
            if entry.pattern.matches(relative_path) {
                merged = Some(match merged.take() {
                    Some(existing) => existing.merge(entry.used_exports.clone()),
                    None => entry.used_exports.clone(),
                });
            }
        }
    }
    merged
}

/// Whether any detected framework claims the path as an entry file.
pub fn is_framework_entry(frameworks: &[DetectedFramework], relative_path: &str) -> bool {
    entry_export_filter(frameworks, relative_path).is_some()
}

/// Whether any detected framework's ignore pattern matches the path.
pub fn is_framework_ignored(frameworks: &[DetectedFramework], relative_path: &str) -> bool {
    frameworks
        .iter()
        .flat_map(|f| &f.config.ignore_patterns)
        .any(|p| p.matches(relative_path))
}

/// Union of all detected frameworks' retention decorators.
pub fn retention_decorators(frameworks: &[DetectedFramework]) -> BTreeSet<String> {
    frameworks
        .iter()
        .flat_map(|f| f.config.retain_decorators.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PackageManifest;
    use std::path::Path;

    fn manifest(json: &str) -> PackageManifest {
        PackageManifest::parse(Path::new("/proj/package.json"), json).unwrap()
    }

    #[test]
    fn test_detect_all_empty_manifest() {
        let registry = FrameworkRegistry::with_builtins();
        let detected = registry.detect_all(Path::new("/proj"), &manifest("{}"));
        assert!(detected.is_empty());
    }

    #[test]
    fn test_detect_all_multiple() {
        let registry = FrameworkRegistry::with_builtins();
        let detected = registry.detect_all(
            Path::new("/proj"),
            &manifest(
                r#"{
                    "dependencies": {"next": "14.2.0"},
                    "devDependencies": {"vitest": "^1.6.0"}
                }"#,
            ),
        );
        let names: Vec<&str> = detected.iter().map(|f| f.name).collect();
        assert!(names.contains(&"next"));
        assert!(names.contains(&"vitest"));
        assert_eq!(detected.len(), 2);
    }

    #[test]
    fn test_export_filter_merge_all_wins() {
        let named = ExportFilter::named(&["default"]);
        assert_eq!(named.merge(ExportFilter::All), ExportFilter::All);
    }

    #[test]
    fn test_entry_export_filter_union() {
        let registry = FrameworkRegistry::with_builtins();
        let detected = registry.detect_all(
            Path::new("/proj"),
            &manifest(r#"{"devDependencies": {"vitest": "^1.6.0"}}"#),
        );
        assert_eq!(
            entry_export_filter(&detected, "src/util.test.ts"),
            Some(ExportFilter::All)
        );
        assert_eq!(entry_export_filter(&detected, "src/util.ts"), None);
    }

    #[test]
    fn test_custom_detector_plugs_in() {
        struct Custom;
        impl FrameworkDetector for Custom {
            fn name(&self) -> &'static str {
                "custom"
            }
            fn detect(
                &self,
                _root: &Path,
                manifest: &PackageManifest,
            ) -> Option<DetectedFramework> {
                manifest.is_listed("custom-framework").then(|| DetectedFramework {
                    name: "custom",
                    version: None,
                    config: FrameworkConfig::default(),
                })
            }
        }

        let mut registry = FrameworkRegistry::new();
        registry.register(Box::new(Custom));
        let detected = registry.detect_all(
            Path::new("/proj"),
            &manifest(r#"{"dependencies": {"custom-framework": "1.0.0"}}"#),
        );
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].name, "custom");
    }
}
