//! File-level reachability: which source files can the runtime load.
//!
//! Builds a directed import graph over the candidate file set and runs a
//! multi-source BFS from the entry files. Over-inclusion is acceptable
//! (a file wrongly considered reachable costs nothing); exclusion is not.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use petgraph::graphmap::DiGraphMap;
use regex::Regex;

use crate::facade::CompilerFacade;
use crate::frameworks::{is_framework_entry, is_framework_ignored, DetectedFramework};
use crate::resolver::ModuleResolver;

/// Path segments never analyzed.
const EXCLUDED_SEGMENTS: &[&str] = &["node_modules", "dist", "build", ".git"];

/// Basenames treated as entries because tooling loads them by convention.
fn is_config_entry(basename: &str) -> bool {
    basename.contains(".config.")
        || matches!(
            basename,
            "babel.config.js" | "postcss.config.js" | ".eslintrc.js" | "tailwind.config.js"
        )
}

fn root_entry_regex() -> Regex {
    Regex::new(r"^(?:src/)?(?:index|main|app|server|worker)\.(?:[cm]?[jt]sx?)$")
        .expect("root entry pattern is valid")
}

/// Result of the reachability pass.
#[derive(Debug, Default)]
pub struct FileReachability {
    pub project_root: PathBuf,
    /// All analyzable files after filtering.
    pub candidates: BTreeSet<PathBuf>,
    /// Files that are entries by convention.
    pub entries: BTreeSet<PathBuf>,
    /// Entries plus everything transitively imported from them.
    pub reachable: BTreeSet<PathBuf>,
}

impl FileReachability {
    pub fn is_candidate(&self, file: &Path) -> bool {
        self.candidates.contains(file)
    }

    pub fn is_entry(&self, file: &Path) -> bool {
        self.entries.contains(file)
    }

    pub fn is_reachable(&self, file: &Path) -> bool {
        self.reachable.contains(file)
    }

    /// The file's path relative to the project root, forward slashes.
    pub fn relative(&self, file: &Path) -> String {
        relative_to(file, &self.project_root)
    }
}

/// Normalize a path relative to `root` (forward slashes; absolute fallback
/// for files outside the root).
pub fn relative_to(file: &Path, root: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.to_string_lossy().replace('\\', "/")
}

fn has_excluded_segment(relative: &str) -> bool {
    relative
        .split('/')
        .any(|segment| EXCLUDED_SEGMENTS.contains(&segment))
}

/// Type-only declaration files (`.d.ts`, `.d.mts`, ...) carry no runtime code.
fn is_declaration_file(basename: &str) -> bool {
    basename.contains(".d.")
}

/// Paths that look machine-generated.
pub fn looks_generated(relative: &str) -> bool {
    let basename = relative.rsplit('/').next().unwrap_or(relative);
    relative.split('/').any(|segment| segment == "generated")
        || basename.contains(".gen.")
        || basename.contains(".generated.")
}

/// Compute the candidate, entry and reachable file sets.
pub fn compute_reachability(
    facade: &dyn CompilerFacade,
    resolver: &ModuleResolver<'_>,
    frameworks: &[DetectedFramework],
    project_root: &Path,
    ignore_generated: bool,
) -> FileReachability {
    let root_entry = root_entry_regex();

    // 1. Candidate set: drop dependency/build/VCS trees, declaration files,
    //    generated files (when enabled) and framework-ignored paths.
    let mut candidates: Vec<PathBuf> = Vec::new();
    for file in facade.source_files() {
        let rel = relative_to(&file, project_root);
        let basename = rel.rsplit('/').next().unwrap_or(&rel);
        if has_excluded_segment(&rel) || is_declaration_file(basename) {
            continue;
        }
        if ignore_generated && looks_generated(&rel) {
            continue;
        }
        if is_framework_ignored(frameworks, &rel) {
            continue;
        }
        candidates.push(file);
    }
    candidates.sort();

    let index: HashMap<&Path, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_path(), i))
        .collect();

    // 2. Entry set: framework entry patterns, root entry names, config files.
    let mut entries: BTreeSet<PathBuf> = BTreeSet::new();
    for file in &candidates {
        let rel = relative_to(file, project_root);
        let basename = rel.rsplit('/').next().unwrap_or(&rel);
        if is_framework_entry(frameworks, &rel)
            || root_entry.is_match(&rel)
            || is_config_entry(basename)
        {
            entries.insert(file.clone());
        }
    }

    // 3. Import graph over candidate indices.
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for i in 0..candidates.len() {
        graph.add_node(i);
    }
    for (i, file) in candidates.iter().enumerate() {
        let Some(module) = facade.module(file) else {
            continue;
        };
        for (specifier, _) in module.specifiers() {
            let Some(target) = resolver.resolve(specifier, file) else {
                // Builtins, packages and unresolvable specifiers do not
                // contribute file edges.
                continue;
            };
            if let Some(&j) = index.get(target.as_path()) {
                if i != j {
                    graph.add_edge(i, j, ());
                }
            }
        }
    }

    // 4. Multi-source BFS from the entry files. Entries are reachable even
    //    when nothing imports them.
    let mut visited = vec![false; candidates.len()];
    let mut queue: std::collections::VecDeque<usize> = entries
        .iter()
        .filter_map(|e| index.get(e.as_path()).copied())
        .collect();
    for &i in &queue {
        visited[i] = true;
    }
    while let Some(node) = queue.pop_front() {
        for neighbor in graph.neighbors(node) {
            if !visited[neighbor] {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    let reachable: BTreeSet<PathBuf> = candidates
        .iter()
        .enumerate()
        .filter(|(i, _)| visited[*i])
        .map(|(_, p)| p.clone())
        .collect();

    FileReachability {
        project_root: project_root.to_path_buf(),
        candidates: candidates.into_iter().collect(),
        entries,
        reachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{Import, MemoryFacade, ModuleFacts};

    fn module_with_imports(path: &str, specifiers: &[&str]) -> ModuleFacts {
        let mut m = ModuleFacts::new(path);
        for s in specifiers {
            m.imports.push(Import::new(*s));
        }
        m
    }

    fn reach(facade: &MemoryFacade) -> FileReachability {
        let resolver = ModuleResolver::new(facade);
        compute_reachability(facade, &resolver, &[], Path::new("/proj"), false)
    }

    #[test]
    fn test_empty_project() {
        let facade = MemoryFacade::new();
        let result = reach(&facade);
        assert!(result.candidates.is_empty());
        assert!(result.reachable.is_empty());
    }

    #[test]
    fn test_simple_dead_file() {
        let mut facade = MemoryFacade::new();
        facade.add_module(module_with_imports("/proj/src/index.ts", &["./used"]));
        facade.add_module(ModuleFacts::new("/proj/src/used.ts"));
        facade.add_module(ModuleFacts::new("/proj/src/dead.ts"));

        let result = reach(&facade);
        assert!(result.is_entry(Path::new("/proj/src/index.ts")));
        assert!(result.is_reachable(Path::new("/proj/src/used.ts")));
        assert!(!result.is_reachable(Path::new("/proj/src/dead.ts")));
        assert!(result.is_candidate(Path::new("/proj/src/dead.ts")));
    }

    #[test]
    fn test_self_import_terminates() {
        let mut facade = MemoryFacade::new();
        facade.add_module(module_with_imports("/proj/src/index.ts", &["./index"]));
        let result = reach(&facade);
        assert!(result.is_reachable(Path::new("/proj/src/index.ts")));
    }

    #[test]
    fn test_import_cycle_terminates() {
        let mut facade = MemoryFacade::new();
        facade.add_module(module_with_imports("/proj/src/main.ts", &["./a"]));
        facade.add_module(module_with_imports("/proj/src/a.ts", &["./b"]));
        facade.add_module(module_with_imports("/proj/src/b.ts", &["./a"]));

        let result = reach(&facade);
        assert!(result.is_reachable(Path::new("/proj/src/a.ts")));
        assert!(result.is_reachable(Path::new("/proj/src/b.ts")));
    }

    #[test]
    fn test_excluded_directories_dropped() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/src/index.ts"));
        facade.add_module(ModuleFacts::new("/proj/node_modules/pkg/index.ts"));
        facade.add_module(ModuleFacts::new("/proj/dist/index.ts"));

        let result = reach(&facade);
        assert_eq!(result.candidates.len(), 1);
    }

    #[test]
    fn test_declaration_files_dropped() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/src/index.ts"));
        facade.add_module(ModuleFacts::new("/proj/src/globals.d.ts"));

        let result = reach(&facade);
        assert!(!result.is_candidate(Path::new("/proj/src/globals.d.ts")));
    }

    #[test]
    fn test_generated_files_dropped_when_enabled() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/src/index.ts"));
        facade.add_module(ModuleFacts::new("/proj/src/generated/api.ts"));
        facade.add_module(ModuleFacts::new("/proj/src/types.gen.ts"));

        let resolver = ModuleResolver::new(&facade);
        let kept = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), false);
        assert_eq!(kept.candidates.len(), 3);

        let resolver = ModuleResolver::new(&facade);
        let dropped = compute_reachability(&facade, &resolver, &[], Path::new("/proj"), true);
        assert_eq!(dropped.candidates.len(), 1);
    }

    #[test]
    fn test_config_basenames_are_entries() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/vite.config.ts"));
        let result = reach(&facade);
        assert!(result.is_entry(Path::new("/proj/vite.config.ts")));
    }

    #[test]
    fn test_root_entry_names() {
        let mut facade = MemoryFacade::new();
        facade.add_module(ModuleFacts::new("/proj/src/server.ts"));
        facade.add_module(ModuleFacts::new("/proj/src/lib/server.ts"));
        let result = reach(&facade);
        assert!(result.is_entry(Path::new("/proj/src/server.ts")));
        // Only root-level names count.
        assert!(!result.is_entry(Path::new("/proj/src/lib/server.ts")));
    }
}
