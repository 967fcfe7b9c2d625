//! Safe manifest fixers.
//!
//! Two operations edit `package.json` directly: remove dependency names
//! from all sections, and move dependencies between the production and
//! development sections. Empty sections are deleted. Neither operation
//! touches source files. Writes are atomic (temp file + rename) and key
//! order is preserved.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{SweepaError, SweepaResult};
use crate::manifest::DependencySection;

/// Result of a fix operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixResult {
    pub removed: Vec<String>,
    pub moved: Vec<String>,
    pub errors: Vec<String>,
}

impl FixResult {
    pub fn changed(&self) -> bool {
        !self.removed.is_empty() || !self.moved.is_empty()
    }
}

fn load_manifest_value(path: &Path) -> SweepaResult<Map<String, Value>> {
    let text = fs::read_to_string(path).map_err(|e| SweepaError::io(path, e))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| SweepaError::manifest(path, e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SweepaError::manifest(path, "manifest root is not an object")),
    }
}

/// Atomic write: temp file in the same directory, then rename.
fn write_manifest_value(path: &Path, manifest: &Map<String, Value>) -> SweepaResult<()> {
    let mut text = serde_json::to_string_pretty(manifest)
        .map_err(|e| SweepaError::fix(e.to_string()))?;
    text.push('\n');

    let tmp = path.with_extension(format!("json.tmp.{}", std::process::id()));
    fs::write(&tmp, &text).map_err(|e| SweepaError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        SweepaError::io(path, e)
    })
}

fn drop_empty_sections(manifest: &mut Map<String, Value>) {
    for section in DependencySection::ALL {
        let key = section.manifest_key();
        let empty = manifest
            .get(key)
            .and_then(|v| v.as_object())
            .is_some_and(|o| o.is_empty());
        if empty {
            manifest.remove(key);
        }
    }
}

/// Remove `names` from every dependency section. In dry-run mode the file
/// is left untouched and the result reports what would change.
pub fn remove_dependencies(
    manifest_path: &Path,
    names: &[String],
    dry_run: bool,
) -> SweepaResult<FixResult> {
    let mut manifest = load_manifest_value(manifest_path)?;
    let mut result = FixResult::default();

    for name in names {
        let mut found = false;
        for section in DependencySection::ALL {
            if let Some(Value::Object(table)) = manifest.get_mut(section.manifest_key()) {
                if table.remove(name.as_str()).is_some() {
                    found = true;
                }
            }
        }
        if found {
            result.removed.push(name.clone());
        } else {
            result.errors.push(format!("'{}' is not listed", name));
        }
    }

    drop_empty_sections(&mut manifest);
    if !dry_run && result.changed() {
        write_manifest_value(manifest_path, &manifest)?;
    }
    Ok(result)
}

/// Move each `(name, target_section)` pair out of whichever section lists
/// it into the target section, keeping the declared version.
pub fn move_dependencies(
    manifest_path: &Path,
    moves: &[(String, DependencySection)],
    dry_run: bool,
) -> SweepaResult<FixResult> {
    let mut manifest = load_manifest_value(manifest_path)?;
    let mut result = FixResult::default();

    for (name, target) in moves {
        let mut version: Option<Value> = None;
        for section in DependencySection::ALL {
            if *section == *target {
                continue;
            }
            if let Some(Value::Object(table)) = manifest.get_mut(section.manifest_key()) {
                if let Some(v) = table.remove(name.as_str()) {
                    version = Some(v);
                }
            }
        }
        let Some(version) = version else {
            result
                .errors
                .push(format!("'{}' is not listed outside {}", name, target));
            continue;
        };
        let table = manifest
            .entry(target.manifest_key().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(table) = table {
            table.insert(name.clone(), version);
        }
        result.moved.push(name.clone());
    }

    drop_empty_sections(&mut manifest);
    if !dry_run && result.changed() {
        write_manifest_value(manifest_path, &manifest)?;
    }
    Ok(result)
}
