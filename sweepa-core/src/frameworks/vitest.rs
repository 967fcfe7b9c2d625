//! Test-framework detector (vitest).
//!
//! Test files and the vitest config are entry files whose exports are all
//! consumed by the runner.

use std::path::Path;

use super::patterns::compile_all;
use super::{DetectedFramework, EntryPattern, ExportFilter, FrameworkConfig, FrameworkDetector};
use crate::manifest::PackageManifest;

pub struct VitestDetector;

const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.{ts,tsx,js,jsx,mts,cts}",
    "**/*.spec.{ts,tsx,js,jsx,mts,cts}",
    "**/__tests__/**/*.{ts,tsx,js,jsx}",
    "vitest.config.{ts,js,mts,mjs}",
    "vitest.workspace.{ts,js,mts,mjs}",
];

impl FrameworkDetector for VitestDetector {
    fn name(&self) -> &'static str {
        "vitest"
    }

    fn detect(&self, _root: &Path, manifest: &PackageManifest) -> Option<DetectedFramework> {
        if !manifest.is_listed("vitest") {
            return None;
        }
        let entry_patterns = compile_all(TEST_FILE_PATTERNS)
            .into_iter()
            .map(|p| EntryPattern::new(p, ExportFilter::All))
            .collect();
        Some(DetectedFramework {
            name: self.name(),
            version: manifest.version_of("vitest").map(String::from),
            config: FrameworkConfig {
                entry_patterns,
                ignore_patterns: Vec::new(),
                retain_decorators: Default::default(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frameworks::entry_export_filter;

    fn detect(json: &str) -> Option<DetectedFramework> {
        let manifest = PackageManifest::parse(Path::new("/proj/package.json"), json).unwrap();
        VitestDetector.detect(Path::new("/proj"), &manifest)
    }

    #[test]
    fn test_not_detected_without_dependency() {
        assert!(detect("{}").is_none());
    }

    #[test]
    fn test_detected_from_dev_dependencies() {
        let fw = detect(r#"{"devDependencies": {"vitest": "^1.6.0"}}"#).unwrap();
        assert_eq!(fw.name, "vitest");
        assert_eq!(fw.version.as_deref(), Some("^1.6.0"));
    }

    #[test]
    fn test_entry_patterns_cover_test_files() {
        let fw = detect(r#"{"devDependencies": {"vitest": "^1.6.0"}}"#).unwrap();
        let frameworks = [fw];
        for path in [
            "src/util.test.ts",
            "src/deep/nested/api.spec.tsx",
            "src/__tests__/setup.ts",
            "vitest.config.ts",
        ] {
            assert_eq!(
                entry_export_filter(&frameworks, path),
                Some(ExportFilter::All),
                "{path} should be a vitest entry"
            );
        }
        assert_eq!(entry_export_filter(&frameworks, "src/util.ts"), None);
    }
}
