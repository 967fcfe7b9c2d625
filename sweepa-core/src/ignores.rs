//! In-source ignore directives and configuration-driven suppression.
//!
//! A `@sweepa-ignore` comment (optional `:kind` suffix, optional
//! comma-separated name list, optional `- reason`) applies to the next
//! line; an inline block-comment directive applies to its own line; a
//! file-top `@sweepa-ignore:all` within the first ten lines suppresses the
//! whole file. In-source directives apply first, configuration second; the
//! order is deterministic.

use std::collections::HashMap;
use std::path::Path;

use crate::config::SweepaConfig;
use crate::facade::CompilerFacade;
use crate::frameworks::patterns::GlobPattern;
use crate::issues::{Issue, IssueKind};

/// The in-source suppression token.
pub const IGNORE_TOKEN: &str = "@sweepa-ignore";

/// How many leading lines may carry the whole-file directive.
const FILE_DIRECTIVE_WINDOW: usize = 10;

#[derive(Debug)]
struct Directive {
    /// 1-indexed line the directive applies to.
    target_line: u32,
    kind: Option<IssueKind>,
    names: Vec<String>,
}

/// Parsed directives of one file.
#[derive(Debug, Default)]
pub struct FileDirectives {
    suppress_all: bool,
    directives: Vec<Directive>,
}

impl FileDirectives {
    pub fn suppresses(&self, issue: &Issue) -> bool {
        if self.suppress_all {
            return true;
        }
        self.directives.iter().any(|d| {
            d.target_line == issue.line
                && d.kind.map_or(true, |k| k == issue.kind)
                && (d.names.is_empty() || d.names.iter().any(|n| n == &issue.name))
        })
    }
}

/// Parse the ignore directives of a source file.
pub fn parse_directives(text: &str) -> FileDirectives {
    let mut parsed = FileDirectives::default();
    for (idx, line) in text.lines().enumerate() {
        let Some(token_pos) = line.find(IGNORE_TOKEN) else {
            continue;
        };
        let after = &line[token_pos + IGNORE_TOKEN.len()..];

        if after.starts_with(":all") {
            if idx < FILE_DIRECTIVE_WINDOW {
                parsed.suppress_all = true;
            }
            continue;
        }

        let (kind, rest) = match after.strip_prefix(':') {
            Some(tail) => {
                let word: String = tail
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                    .collect();
                (IssueKind::parse(&word), &tail[word.len()..])
            }
            None => (None, after),
        };

        // Drop the optional `- reason` suffix and block-comment closer.
        let rest = rest.split(" - ").next().unwrap_or(rest);
        let rest = rest.replace("*/", "");
        let names: Vec<String> = rest
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        // Inline directives (code before the comment) apply to their own
        // line; standalone comments apply to the next.
        let comment_start = [line.find("//"), line.find("/*")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(token_pos);
        let inline = !line[..comment_start].trim().is_empty();
        let target_line = if inline { idx + 1 } else { idx + 2 } as u32;

        parsed.directives.push(Directive {
            target_line,
            kind,
            names,
        });
    }
    parsed
}

/// Apply in-source directives, then configuration ignores, to the final
/// issue list.
pub fn apply_ignores(
    issues: Vec<Issue>,
    facade: &dyn CompilerFacade,
    config: &SweepaConfig,
    project_root: &Path,
) -> Vec<Issue> {
    let mut directive_cache: HashMap<std::path::PathBuf, FileDirectives> = HashMap::new();
    let mut glob_cache: HashMap<String, Option<GlobPattern>> = HashMap::new();

    let mut compile = move |cache: &mut HashMap<String, Option<GlobPattern>>, glob: &str| {
        cache
            .entry(glob.to_string())
            .or_insert_with(|| GlobPattern::compile(glob).ok())
            .clone()
    };

    issues
        .into_iter()
        .filter(|issue| {
            // 1. In-source directives.
            let directives = directive_cache
                .entry(issue.file.clone())
                .or_insert_with(|| {
                    facade
                        .source_text(&issue.file)
                        .map(parse_directives)
                        .unwrap_or_default()
                });
            if directives.suppresses(issue) {
                return false;
            }

            // 2. Configuration ignores, workspace-scoped.
            let rel = issue.relative_file(project_root);
            for (glob, kinds) in config.issue_suppressions_for(&rel) {
                if kinds.is_empty() || kinds.contains(&issue.kind) {
                    if let Some(pattern) = compile(&mut glob_cache, glob) {
                        if pattern.matches(&rel) {
                            return false;
                        }
                    }
                }
            }
            if issue.kind.is_dependency_kind()
                && config
                    .ignored_dependencies_for(&rel)
                    .iter()
                    .any(|name| *name == issue.name)
            {
                return false;
            }
            if issue.kind == IssueKind::UnresolvedImport {
                for glob in config.ignored_unresolved_for(&rel) {
                    if let Some(pattern) = compile(&mut glob_cache, glob) {
                        if pattern.matches(&issue.name) {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .collect()
}
