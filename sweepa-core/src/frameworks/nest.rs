//! Server-framework detector (NestJS).
//!
//! Nest loads code through decorators and a single bootstrap file; decorated
//! classes and handlers must be retained even with zero static call sites.

use std::collections::BTreeSet;
use std::path::Path;

use super::patterns::compile_all;
use super::{DetectedFramework, EntryPattern, ExportFilter, FrameworkConfig, FrameworkDetector};
use crate::manifest::PackageManifest;

pub struct NestDetector;

const ENTRY_PATTERNS: &[&str] = &["src/main.{ts,js}", "src/main.*.{ts,js}"];

/// Decorators denoting framework-managed code.
const RETAIN_DECORATORS: &[&str] = &[
    "Injectable",
    "Controller",
    "Module",
    "Resolver",
    "Catch",
    "Get",
    "Post",
    "Put",
    "Patch",
    "Delete",
    "Head",
    "Options",
    "All",
    "Query",
    "Mutation",
    "Subscription",
    "UseGuards",
    "UseInterceptors",
    "UsePipes",
];

impl FrameworkDetector for NestDetector {
    fn name(&self) -> &'static str {
        "nest"
    }

    fn detect(&self, _root: &Path, manifest: &PackageManifest) -> Option<DetectedFramework> {
        if !manifest.is_listed("@nestjs/core") && !manifest.is_listed("@nestjs/common") {
            return None;
        }
        let entry_patterns = compile_all(ENTRY_PATTERNS)
            .into_iter()
            .map(|p| EntryPattern::new(p, ExportFilter::All))
            .collect();
        let retain_decorators: BTreeSet<String> =
            RETAIN_DECORATORS.iter().map(|s| s.to_string()).collect();
        Some(DetectedFramework {
            name: self.name(),
            version: manifest
                .version_of("@nestjs/core")
                .or_else(|| manifest.version_of("@nestjs/common"))
                .map(String::from),
            config: FrameworkConfig {
                entry_patterns,
                ignore_patterns: Vec::new(),
                retain_decorators,
            },
        })
    }
}
