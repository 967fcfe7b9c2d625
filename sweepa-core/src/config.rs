//! Configuration loading from sweepa.toml.
//!
//! Workspace-scoped overrides merge in order of increasing prefix
//! specificity; the most specific override wins for scalar settings, list
//! settings accumulate.

use std::collections::BTreeMap;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::exports::ExportMode;
use crate::issues::IssueKind;

/// Main configuration structure for sweepa.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepaConfig {
    /// Glob -> issue kinds to suppress under that glob. An empty kind list
    /// suppresses every kind.
    #[serde(default)]
    pub ignore_issues: BTreeMap<String, Vec<IssueKind>>,
    /// Dependency names exempt from dependency issues.
    #[serde(default)]
    pub ignore_dependencies: Vec<String>,
    /// Specifier globs exempt from `unresolved-import`.
    #[serde(default)]
    pub ignore_unresolved: Vec<String>,
    /// Gate for module-boundary export analysis.
    #[serde(default)]
    pub unused_exported: ExportMode,
    /// Exclude generated-looking files from export reporting.
    #[serde(default)]
    pub unused_exported_ignore_generated: bool,
    /// Exclude generated-looking files from the candidate set entirely.
    #[serde(default)]
    pub ignore_generated: bool,
    /// User-supplied decorator names to retain in addition to the framework
    /// table.
    #[serde(default)]
    pub retain_decorators: Vec<String>,
    /// Retain every decorated symbol, regardless of decorator name.
    #[serde(default)]
    pub retain_all_decorated: bool,
    /// Workspace path prefix -> nested overrides.
    #[serde(default)]
    pub workspaces: BTreeMap<String, WorkspaceOverride>,
}

/// Overrides scoped to one workspace prefix.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceOverride {
    #[serde(default)]
    pub ignore_issues: BTreeMap<String, Vec<IssueKind>>,
    #[serde(default)]
    pub ignore_dependencies: Vec<String>,
    #[serde(default)]
    pub ignore_unresolved: Vec<String>,
    #[serde(default)]
    pub unused_exported: Option<ExportMode>,
}

/// Loads configuration from sweepa.toml if it exists.
///
/// Malformed configuration returns an error; the caller decides whether that
/// is fatal (strict-config mode) or a warning with defaults.
pub fn load_config(root: &Path) -> Result<Option<SweepaConfig>> {
    let path = root.join("sweepa.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).context("Invalid sweepa.toml")?;
    Ok(Some(cfg))
}

impl SweepaConfig {
    /// Workspace overrides whose prefix contains `relative_path`, least
    /// specific first.
    fn overrides_for(&self, relative_path: &str) -> Vec<&WorkspaceOverride> {
        let mut hits: Vec<(&str, &WorkspaceOverride)> = self
            .workspaces
            .iter()
            .filter(|(prefix, _)| {
                let prefix = prefix.trim_end_matches('/');
                relative_path == prefix
                    || relative_path.starts_with(&format!("{}/", prefix))
            })
            .map(|(prefix, o)| (prefix.as_str(), o))
            .collect();
        hits.sort_by_key(|(prefix, _)| prefix.len());
        hits.into_iter().map(|(_, o)| o).collect()
    }

    /// The effective export-analysis mode for a file.
    pub fn export_mode_for(&self, relative_path: &str) -> ExportMode {
        self.overrides_for(relative_path)
            .into_iter()
            .rev()
            .find_map(|o| o.unused_exported)
            .unwrap_or(self.unused_exported)
    }

    /// Every (glob, kinds) suppression applying at `relative_path`:
    /// the base table plus all matching workspace overrides.
    pub fn issue_suppressions_for(
        &self,
        relative_path: &str,
    ) -> Vec<(&String, &Vec<IssueKind>)> {
        let mut entries: Vec<(&String, &Vec<IssueKind>)> = self.ignore_issues.iter().collect();
        for over in self.overrides_for(relative_path) {
            entries.extend(over.ignore_issues.iter());
        }
        entries
    }

    /// Ignored dependency names effective at `relative_path`.
    pub fn ignored_dependencies_for(&self, relative_path: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self.ignore_dependencies.iter().map(|s| s.as_str()).collect();
        for over in self.overrides_for(relative_path) {
            names.extend(over.ignore_dependencies.iter().map(|s| s.as_str()));
        }
        names
    }

    /// Ignored unresolved-specifier globs effective at `relative_path`.
    pub fn ignored_unresolved_for(&self, relative_path: &str) -> Vec<&str> {
        let mut globs: Vec<&str> = self.ignore_unresolved.iter().map(|s| s.as_str()).collect();
        for over in self.overrides_for(relative_path) {
            globs.extend(over.ignore_unresolved.iter().map(|s| s.as_str()));
        }
        globs
    }
}
