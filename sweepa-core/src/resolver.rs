//! Module resolution layered over the compiler facade.
//!
//! The resolver is a pure function over the compiler configuration and the
//! file system; results are memoized by `(containing_directory, specifier)`
//! so repeated lookups from sibling files hit the cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::facade::CompilerFacade;
use crate::specifier::{classify, SpecifierKind};

/// Resolves import specifiers to absolute file paths.
pub struct ModuleResolver<'f> {
    facade: &'f dyn CompilerFacade,
    cache: Mutex<HashMap<(PathBuf, String), Option<PathBuf>>>,
}

impl<'f> ModuleResolver<'f> {
    pub fn new(facade: &'f dyn CompilerFacade) -> Self {
        Self {
            facade,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `specifier` from `containing_file`.
    ///
    /// Returns `None` for runtime builtins, virtual modules, and anything
    /// the compiler cannot resolve. The caller interprets absence.
    pub fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        if classify(specifier) == SpecifierKind::Builtin {
            return None;
        }
        let dir = containing_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let key = (dir, specifier.to_string());
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }
        let resolved = self.facade.resolve_module(specifier, containing_file);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, resolved.clone());
        }
        resolved
    }
}
