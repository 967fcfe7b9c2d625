//! Baseline protocol: snapshot the current issue list, then report only
//! issues whose stable hash is not in the snapshot.
//!
//! Hashes exclude line and column (see the issue model), so a baseline
//! survives unrelated edits to the same files.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{SweepaError, SweepaResult};
use crate::issues::Issue;

/// Current baseline format version. Increment when the format changes.
pub const BASELINE_VERSION: u32 = 1;

/// One remembered issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineIssue {
    pub hash: String,
    pub kind: String,
    pub name: String,
    /// Project-relative path.
    pub file: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// The baseline file model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub version: u32,
    pub timestamp: u64,
    pub project_root: String,
    pub total_issues: usize,
    pub issues_by_kind: BTreeMap<String, usize>,
    pub issues: Vec<BaselineIssue>,
}

impl Baseline {
    /// The set of remembered hashes.
    pub fn hashes(&self) -> HashSet<&str> {
        self.issues.iter().map(|i| i.hash.as_str()).collect()
    }

    pub fn is_compatible(&self) -> bool {
        self.version == BASELINE_VERSION
    }
}

/// Snapshot an issue list.
pub fn create_baseline(issues: &[Issue], project_root: &Path) -> Baseline {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut issues_by_kind: BTreeMap<String, usize> = BTreeMap::new();
    for issue in issues {
        *issues_by_kind
            .entry(issue.kind.as_str().to_string())
            .or_insert(0) += 1;
    }

    Baseline {
        version: BASELINE_VERSION,
        timestamp,
        project_root: project_root.to_string_lossy().into_owned(),
        total_issues: issues.len(),
        issues_by_kind,
        issues: issues
            .iter()
            .map(|issue| BaselineIssue {
                hash: issue.stable_hash(project_root),
                kind: issue.kind.as_str().to_string(),
                name: issue.name.clone(),
                file: issue.relative_file(project_root),
                line: issue.line,
                parent: issue.parent.clone(),
            })
            .collect(),
    }
}

/// Keep only issues whose hash is not in the baseline.
pub fn filter_issues(issues: Vec<Issue>, baseline: &Baseline, project_root: &Path) -> Vec<Issue> {
    let known = baseline.hashes();
    issues
        .into_iter()
        .filter(|issue| !known.contains(issue.stable_hash(project_root).as_str()))
        .collect()
}

/// Load a baseline file.
pub fn load_baseline(path: &Path) -> SweepaResult<Baseline> {
    let text = fs::read_to_string(path).map_err(|e| SweepaError::io(path, e))?;
    let baseline: Baseline = serde_json::from_str(&text)
        .map_err(|e| SweepaError::baseline(format!("{}: {}", path.display(), e)))?;
    if !baseline.is_compatible() {
        return Err(SweepaError::baseline(format!(
            "baseline version {} is incompatible with current version {}",
            baseline.version, BASELINE_VERSION
        )));
    }
    Ok(baseline)
}

/// Write a baseline file (pretty-printed, trailing newline).
pub fn save_baseline(path: &Path, baseline: &Baseline) -> SweepaResult<()> {
    let mut text = serde_json::to_string_pretty(baseline)
        .map_err(|e| SweepaError::baseline(e.to_string()))?;
    text.push('\n');
    fs::write(path, text).map_err(|e| SweepaError::io(path, e))
}
