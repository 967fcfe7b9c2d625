//! File-based routing detector (Next.js).
//!
//! Route files export by convention: the default component plus the named
//! convention exports the framework reads. Only those names count as used;
//! other exports in a route file are still reportable.

use std::path::Path;

use super::patterns::compile_all;
use super::{DetectedFramework, EntryPattern, ExportFilter, FrameworkConfig, FrameworkDetector};
use crate::manifest::PackageManifest;

pub struct NextDetector;

/// Named exports the router consumes from `pages/` and `app/` files.
const ROUTE_EXPORTS: &[&str] = &[
    "default",
    "config",
    "metadata",
    "viewport",
    "revalidate",
    "dynamic",
    "generateMetadata",
    "generateViewport",
    "generateStaticParams",
    "getStaticProps",
    "getStaticPaths",
    "getServerSideProps",
];

/// Route handlers export HTTP-verb functions.
const ROUTE_HANDLER_EXPORTS: &[&str] = &[
    "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS",
];

const PAGE_PATTERNS: &[&str] = &[
    "pages/**/*.{ts,tsx,js,jsx}",
    "src/pages/**/*.{ts,tsx,js,jsx}",
    "app/**/{page,layout,template,loading,error,not-found,global-error,default}.{ts,tsx,js,jsx}",
    "src/app/**/{page,layout,template,loading,error,not-found,global-error,default}.{ts,tsx,js,jsx}",
    "middleware.{ts,js}",
    "src/middleware.{ts,js}",
    "next.config.{js,mjs,ts}",
];

const ROUTE_HANDLER_PATTERNS: &[&str] =
    &["app/**/route.{ts,js}", "src/app/**/route.{ts,js}"];

const IGNORE_PATTERNS: &[&str] = &[".next/**", "out/**"];

impl FrameworkDetector for NextDetector {
    fn name(&self) -> &'static str {
        "next"
    }

    fn detect(&self, _root: &Path, manifest: &PackageManifest) -> Option<DetectedFramework> {
        if !manifest.is_listed("next") {
            return None;
        }
        let mut entry_patterns: Vec<EntryPattern> = compile_all(PAGE_PATTERNS)
            .into_iter()
            .map(|p| EntryPattern::new(p, ExportFilter::named(ROUTE_EXPORTS)))
            .collect();
        entry_patterns.extend(
            compile_all(ROUTE_HANDLER_PATTERNS)
                .into_iter()
                .map(|p| EntryPattern::new(p, ExportFilter::named(ROUTE_HANDLER_EXPORTS))),
        );
        Some(DetectedFramework {
            name: self.name(),
            version: manifest.version_of("next").map(String::from),
            config: FrameworkConfig {
                entry_patterns,
                ignore_patterns: compile_all(IGNORE_PATTERNS),
                retain_decorators: Default::default(),
            },
        })
    }
}
