//! Issue model: the closed taxonomy, confidence levels, stable hashing and
//! deterministic ordering of the final issue list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::facade::DeclKind;
use crate::manifest::DependencySection;

/// The closed issue taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    UnusedFile,
    UnusedDependency,
    MisplacedDependency,
    UnlistedDependency,
    UnresolvedImport,
    UnusedExported,
    UnusedExportedType,
    UnusedExport,
    UnusedMethod,
    UnusedParam,
    UnusedProperty,
    UnusedImport,
    UnusedEnumCase,
    AssignOnlyProperty,
    UnusedVariable,
    UnusedType,
    RedundantExport,
}

impl IssueKind {
    /// All kinds, for reporting and config validation.
    pub const ALL: &'static [IssueKind] = &[
        Self::UnusedFile,
        Self::UnusedDependency,
        Self::MisplacedDependency,
        Self::UnlistedDependency,
        Self::UnresolvedImport,
        Self::UnusedExported,
        Self::UnusedExportedType,
        Self::UnusedExport,
        Self::UnusedMethod,
        Self::UnusedParam,
        Self::UnusedProperty,
        Self::UnusedImport,
        Self::UnusedEnumCase,
        Self::AssignOnlyProperty,
        Self::UnusedVariable,
        Self::UnusedType,
        Self::RedundantExport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnusedFile => "unused-file",
            Self::UnusedDependency => "unused-dependency",
            Self::MisplacedDependency => "misplaced-dependency",
            Self::UnlistedDependency => "unlisted-dependency",
            Self::UnresolvedImport => "unresolved-import",
            Self::UnusedExported => "unused-exported",
            Self::UnusedExportedType => "unused-exported-type",
            Self::UnusedExport => "unused-export",
            Self::UnusedMethod => "unused-method",
            Self::UnusedParam => "unused-param",
            Self::UnusedProperty => "unused-property",
            Self::UnusedImport => "unused-import",
            Self::UnusedEnumCase => "unused-enum-case",
            Self::AssignOnlyProperty => "assign-only-property",
            Self::UnusedVariable => "unused-variable",
            Self::UnusedType => "unused-type",
            Self::RedundantExport => "redundant-export",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Kinds emitted by the dependency analyzer (subject to the
    /// `ignore_dependencies` configuration list).
    pub fn is_dependency_kind(&self) -> bool {
        matches!(
            self,
            Self::UnusedDependency | Self::MisplacedDependency | Self::UnlistedDependency
        )
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence level for an issue.
///
/// High means no references at all and no dynamic-access patterns nearby;
/// medium covers public-surface and interface-conformance uncertainty; low
/// means decorators or dynamic patterns were seen in the file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Section-change record attached to `misplaced-dependency` issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChange {
    pub current_section: DependencySection,
    pub recommended_section: DependencySection,
}

/// One reported issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub confidence: Confidence,
    /// The symbol, file, package or specifier name the issue is about.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_kind: Option<DeclKind>,
    /// Absolute path of the file the issue anchors to.
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub message: String,
    /// Qualified parent (class for a method, enum for a member).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<SectionChange>,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        name: impl Into<String>,
        file: impl Into<PathBuf>,
        line: u32,
        column: u32,
    ) -> Self {
        let name = name.into();
        Self {
            message: format!("'{}' ({})", name, kind.as_str()),
            kind,
            confidence: Confidence::High,
            name,
            symbol_kind: None,
            file: file.into(),
            line,
            column,
            parent: None,
            context: None,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_symbol_kind(mut self, kind: DeclKind) -> Self {
        self.symbol_kind = Some(kind);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_context(mut self, context: SectionChange) -> Self {
        self.context = Some(context);
        self
    }

    /// The issue's file relative to the project root, with forward slashes.
    ///
    /// Falls back to the absolute path when the file lies outside the root,
    /// so hashing stays total.
    pub fn relative_file(&self, project_root: &Path) -> String {
        let rel = self.file.strip_prefix(project_root).unwrap_or(&self.file);
        rel.to_string_lossy().replace('\\', "/")
    }

    /// Stable identity hash over `(kind, name, parent, relative file)`.
    ///
    /// Line and column are deliberately excluded so baselines survive edits
    /// elsewhere in the file.
    pub fn stable_hash(&self, project_root: &Path) -> String {
        let mut sha = Sha256::new();
        sha.update(self.kind.as_str().as_bytes());
        sha.update(b"\0");
        sha.update(self.name.as_bytes());
        sha.update(b"\0");
        sha.update(self.parent.as_deref().unwrap_or("").as_bytes());
        sha.update(b"\0");
        sha.update(self.relative_file(project_root).as_bytes());
        format!("{:x}", sha.finalize())
    }
}

/// Sort issues into the canonical output order:
/// `(relative_file, line, column, kind, name)`.
///
/// The order is independent of internal scheduling, so two runs over the
/// same tree produce identical output.
pub fn sort_issues(issues: &mut [Issue], project_root: &Path) {
    issues.sort_by(|a, b| {
        (
            a.relative_file(project_root),
            a.line,
            a.column,
            a.kind.as_str(),
            &a.name,
        )
            .cmp(&(
                b.relative_file(project_root),
                b.line,
                b.column,
                b.kind.as_str(),
                &b.name,
            ))
    });
}

/// Drop issues with identical `(kind, name, parent, file, line)` identity.
/// Detectors are independent; overlap between them must not double-report.
pub fn dedupe_issues(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen = std::collections::HashSet::new();
    issues
        .into_iter()
        .filter(|i| {
            seen.insert((
                i.kind,
                i.name.clone(),
                i.parent.clone(),
                i.file.clone(),
                i.line,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in IssueKind::ALL {
            assert_eq!(IssueKind::parse(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_hash_excludes_position() {
        let root = Path::new("/proj");
        let a = Issue::new(IssueKind::UnusedExport, "helper", "/proj/src/util.ts", 10, 1);
        let b = Issue::new(IssueKind::UnusedExport, "helper", "/proj/src/util.ts", 99, 7);
        assert_eq!(a.stable_hash(root), b.stable_hash(root));
    }

    #[test]
    fn test_hash_depends_on_kind_name_parent_file() {
        let root = Path::new("/proj");
        let base = Issue::new(IssueKind::UnusedExport, "helper", "/proj/src/util.ts", 1, 1);
        let other_kind = Issue::new(IssueKind::UnusedType, "helper", "/proj/src/util.ts", 1, 1);
        let other_name = Issue::new(IssueKind::UnusedExport, "other", "/proj/src/util.ts", 1, 1);
        let with_parent = base.clone().with_parent("Service");

        assert_ne!(base.stable_hash(root), other_kind.stable_hash(root));
        assert_ne!(base.stable_hash(root), other_name.stable_hash(root));
        assert_ne!(base.stable_hash(root), with_parent.stable_hash(root));
    }

    #[test]
    fn test_hash_is_root_relative() {
        let a = Issue::new(IssueKind::UnusedExport, "x", "/a/proj/src/m.ts", 1, 1);
        let b = Issue::new(IssueKind::UnusedExport, "x", "/b/proj/src/m.ts", 1, 1);
        assert_eq!(
            a.stable_hash(Path::new("/a/proj")),
            b.stable_hash(Path::new("/b/proj"))
        );
    }

    #[test]
    fn test_sort_order() {
        let root = Path::new("/proj");
        let mut issues = vec![
            Issue::new(IssueKind::UnusedExport, "b", "/proj/src/z.ts", 1, 1),
            Issue::new(IssueKind::UnusedExport, "a", "/proj/src/a.ts", 5, 1),
            Issue::new(IssueKind::UnusedType, "a", "/proj/src/a.ts", 2, 1),
        ];
        sort_issues(&mut issues, root);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[1].line, 5);
        assert_eq!(issues[2].file, PathBuf::from("/proj/src/z.ts"));
    }

    #[test]
    fn test_dedupe() {
        let issues = vec![
            Issue::new(IssueKind::UnusedExport, "a", "/proj/src/a.ts", 1, 1),
            Issue::new(IssueKind::UnusedExport, "a", "/proj/src/a.ts", 1, 1),
        ];
        assert_eq!(dedupe_issues(issues).len(), 1);
    }
}
