//! Glob pattern matching for framework entry and ignore patterns.
//!
//! Patterns are anchored to full project-relative paths. Supported syntax:
//! `**` (zero or more directory segments), `*` (any run of characters except
//! `/`), `?` (one character except `/`) and `{a,b}` alternation. Patterns
//! compile once to a `regex::Regex`.

use regex::Regex;

use crate::error::{SweepaError, SweepaResult};

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob into an anchored regex.
    pub fn compile(pattern: &str) -> SweepaResult<Self> {
        let regex_src = glob_to_regex(pattern)?;
        let regex = Regex::new(&regex_src).map_err(|e| SweepaError::Internal {
            message: format!("glob '{}' compiled to invalid regex: {}", pattern, e),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Match against a project-relative path (forward slashes).
    pub fn matches(&self, relative_path: &str) -> bool {
        self.regex.is_match(relative_path)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Translate glob syntax to an anchored regex source string.
fn glob_to_regex(pattern: &str) -> SweepaResult<String> {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    let mut brace_depth = 0usize;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    // `**/` spans zero or more directory segments; a bare
                    // trailing `**` spans anything.
                    if chars.get(i + 2) == Some(&'/') {
                        out.push_str("(?:[^/]+/)*");
                        i += 3;
                    } else {
                        out.push_str(".*");
                        i += 2;
                    }
                    continue;
                }
                out.push_str("[^/]*");
            }
            '?' => out.push_str("[^/]"),
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' => {
                if brace_depth == 0 {
                    return Err(SweepaError::Internal {
                        message: format!("unbalanced '}}' in glob '{}'", pattern),
                    });
                }
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    if brace_depth != 0 {
        return Err(SweepaError::Internal {
            message: format!("unbalanced '{{' in glob '{}'", pattern),
        });
    }
    out.push('$');
    Ok(out)
}

/// Compile a list of globs, skipping (and warning about) invalid ones.
pub fn compile_all(patterns: &[&str]) -> Vec<GlobPattern> {
    patterns
        .iter()
        .filter_map(|p| match GlobPattern::compile(p) {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::warn!(pattern = *p, error = %e, "skipping invalid glob pattern");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        GlobPattern::compile(pattern).unwrap().matches(path)
    }

    #[test]
    fn test_star_stays_within_segment() {
        assert!(matches("src/*.ts", "src/app.ts"));
        assert!(!matches("src/*.ts", "src/sub/app.ts"));
    }

    #[test]
    fn test_double_star_spans_segments() {
        assert!(matches("src/**/*.ts", "src/a/b/c.ts"));
        assert!(matches("src/**/*.ts", "src/c.ts"));
        assert!(!matches("src/**/*.ts", "lib/c.ts"));
    }

    #[test]
    fn test_trailing_double_star() {
        assert!(matches(".next/**", ".next/static/chunk.js"));
        assert!(!matches(".next/**", "src/app.ts"));
    }

    #[test]
    fn test_alternation() {
        assert!(matches("**/*.{test,spec}.ts", "src/a/util.test.ts"));
        assert!(matches("**/*.{test,spec}.ts", "util.spec.ts"));
        assert!(!matches("**/*.{test,spec}.ts", "util.ts"));
    }

    #[test]
    fn test_question_mark() {
        assert!(matches("file.?s", "file.ts"));
        assert!(!matches("file.?s", "file.s"));
        assert!(!matches("file.?s", "file./s"));
    }

    #[test]
    fn test_anchored_to_full_path() {
        assert!(!matches("app.ts", "src/app.ts"));
        assert!(matches("src/app.ts", "src/app.ts"));
    }

    #[test]
    fn test_regex_metachars_escaped() {
        assert!(matches("a+b.ts", "a+b.ts"));
        assert!(!matches("a+b.ts", "aab.ts"));
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert!(GlobPattern::compile("src/{a,b.ts").is_err());
        assert!(GlobPattern::compile("src/a,b}.ts").is_err());
    }
}
