//! Database-schema library detector (Drizzle ORM).
//!
//! Schema files are consumed by the migration tooling through the drizzle
//! config, not by imports, so their exports are used by convention.

use std::path::Path;

use super::patterns::compile_all;
use super::{DetectedFramework, EntryPattern, ExportFilter, FrameworkConfig, FrameworkDetector};
use crate::manifest::PackageManifest;

pub struct DrizzleDetector;

const SCHEMA_PATTERNS: &[&str] = &[
    "drizzle.config.{ts,js,mts}",
    "**/schema.{ts,js}",
    "**/db/schema/**/*.{ts,js}",
    "**/drizzle/**/*.{ts,js}",
];

impl FrameworkDetector for DrizzleDetector {
    fn name(&self) -> &'static str {
        "drizzle"
    }

    fn detect(&self, _root: &Path, manifest: &PackageManifest) -> Option<DetectedFramework> {
        if !manifest.is_listed("drizzle-orm") {
            return None;
        }
        let entry_patterns = compile_all(SCHEMA_PATTERNS)
            .into_iter()
            .map(|p| EntryPattern::new(p, ExportFilter::All))
            .collect();
        Some(DetectedFramework {
            name: self.name(),
            version: manifest.version_of("drizzle-orm").map(String::from),
            config: FrameworkConfig {
                entry_patterns,
                ignore_patterns: Vec::new(),
                retain_decorators: Default::default(),
            },
        })
    }
}
