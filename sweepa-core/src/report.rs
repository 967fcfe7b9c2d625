//! Output formatting - plaintext and JSON.

use std::path::Path;

use serde_json::json;

use crate::issues::Issue;

/// Prints issues in plain text format, one line per issue.
pub fn print_plain(issues: &[Issue], project_root: &Path) {
    if issues.is_empty() {
        println!("No issues found.");
        return;
    }
    println!("ISSUES ({}):", issues.len());
    for issue in issues {
        println!(
            "{}:{}:{} [{}] {} ({})",
            issue.relative_file(project_root),
            issue.line,
            issue.column,
            issue.kind.as_str(),
            issue.message,
            issue.confidence
        );
    }
}

/// Serialize issues to JSON with project-relative paths and stable hashes.
pub fn to_json(issues: &[Issue], project_root: &Path) -> serde_json::Result<String> {
    let entries: Vec<serde_json::Value> = issues
        .iter()
        .map(|issue| {
            let mut entry = json!({
                "kind": issue.kind.as_str(),
                "confidence": issue.confidence.as_str(),
                "name": issue.name,
                "file": issue.relative_file(project_root),
                "line": issue.line,
                "column": issue.column,
                "message": issue.message,
                "hash": issue.stable_hash(project_root),
            });
            if let Some(parent) = &issue.parent {
                entry["parent"] = json!(parent);
            }
            if let Some(kind) = issue.symbol_kind {
                entry["symbol_kind"] = json!(kind.display_name());
            }
            if let Some(change) = issue.context {
                entry["context"] = json!({
                    "current_section": change.current_section.manifest_key(),
                    "recommended_section": change.recommended_section.manifest_key(),
                });
            }
            entry
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "issues": entries, "total": issues.len() }))
}

/// Prints issues in JSON format.
///
/// Falls back to the plain format if serialization fails.
pub fn print_json(issues: &[Issue], project_root: &Path) {
    match to_json(issues, project_root) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            print_plain(issues, project_root);
        }
    }
}
