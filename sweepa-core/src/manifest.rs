//! Package manifest model and workspace manifest discovery.
//!
//! The dependency analyzer and the fixers operate on `package.json`; the
//! redundancy detector uses manifest directories as package boundaries.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{SweepaError, SweepaResult};

/// Directories never descended into during manifest discovery.
const EXCLUDED_DIRS: &[&str] = &["node_modules", "dist", "build", ".git"];

/// A dependency section of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySection {
    Production,
    Development,
    Peer,
    Optional,
}

impl DependencySection {
    /// The manifest key of this section.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            Self::Production => "dependencies",
            Self::Development => "devDependencies",
            Self::Peer => "peerDependencies",
            Self::Optional => "optionalDependencies",
        }
    }

    pub const ALL: &'static [DependencySection] = &[
        Self::Production,
        Self::Development,
        Self::Peer,
        Self::Optional,
    ];
}

impl std::fmt::Display for DependencySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.manifest_key())
    }
}

/// Minimal subset of `package.json` the engine needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Load and decode a manifest file.
    pub fn load(path: &Path) -> SweepaResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| SweepaError::io(path, e))?;
        Self::parse(path, &text)
    }

    /// Decode manifest text (path only used for error context).
    pub fn parse(path: &Path, text: &str) -> SweepaResult<Self> {
        serde_json::from_str(text).map_err(|e| SweepaError::manifest(path, e.to_string()))
    }

    fn section_map(&self, section: DependencySection) -> &BTreeMap<String, String> {
        match section {
            DependencySection::Production => &self.dependencies,
            DependencySection::Development => &self.dev_dependencies,
            DependencySection::Peer => &self.peer_dependencies,
            DependencySection::Optional => &self.optional_dependencies,
        }
    }

    /// Every section listing `package`, in section order.
    pub fn sections_of(&self, package: &str) -> Vec<DependencySection> {
        DependencySection::ALL
            .iter()
            .copied()
            .filter(|s| self.section_map(*s).contains_key(package))
            .collect()
    }

    /// Whether `package` appears in any section.
    pub fn is_listed(&self, package: &str) -> bool {
        !self.sections_of(package).is_empty()
    }

    /// The declared version of `package`, from the first section listing it.
    pub fn version_of(&self, package: &str) -> Option<&str> {
        DependencySection::ALL
            .iter()
            .find_map(|s| self.section_map(*s).get(package).map(|v| v.as_str()))
    }

    /// Every listed package name, deduplicated across sections.
    pub fn listed_packages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = DependencySection::ALL
            .iter()
            .flat_map(|s| self.section_map(*s).keys().map(|k| k.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Find every `package.json` under `root`, skipping dependency and build
/// output directories. Sorted for deterministic downstream iteration.
pub fn find_manifests(root: &Path) -> Vec<PathBuf> {
    let mut manifests: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| EXCLUDED_DIRS.contains(&name)))
        })
        .filter_map(|entry| entry.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "package.json")
        .map(|e| e.path().to_path_buf())
        .collect();
    manifests.sort();
    manifests
}

/// The package boundary of `file`: the directory of the nearest manifest
/// that is an ancestor of the file.
pub fn package_boundary<'a>(file: &Path, manifest_dirs: &'a [PathBuf]) -> Option<&'a Path> {
    manifest_dirs
        .iter()
        .filter(|dir| file.starts_with(dir))
        .max_by_key(|dir| dir.components().count())
        .map(|p| p.as_path())
}
