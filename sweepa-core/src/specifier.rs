//! Import specifier classification.
//!
//! Splits raw specifiers into runtime builtins, filesystem paths and
//! package-qualified imports, and extracts canonical package names
//! (scoped packages keep their first two segments).

/// Runtime builtin modules (sorted, for binary search). Both the bare form
/// and the `node:`-prefixed form are recognised.
const RUNTIME_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Classification of an import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// A standard-library module of the target runtime.
    Builtin,
    /// A relative or absolute filesystem path.
    Path,
    /// Anything else: resolved through the package manager.
    Package,
}

/// Classify a raw import specifier.
pub fn classify(specifier: &str) -> SpecifierKind {
    if is_builtin(specifier) {
        return SpecifierKind::Builtin;
    }
    if specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || specifier.starts_with("file:")
    {
        return SpecifierKind::Path;
    }
    SpecifierKind::Package
}

/// Check whether a specifier names a runtime builtin.
///
/// Subpath imports of a builtin (`fs/promises`) count as builtins too.
pub fn is_builtin(specifier: &str) -> bool {
    let bare = specifier.strip_prefix("node:").unwrap_or(specifier);
    let root = bare.split('/').next().unwrap_or(bare);
    RUNTIME_BUILTINS.binary_search(&root).is_ok()
}

/// Extract the canonical package name from a package-qualified specifier.
///
/// The package name is the first path segment, except for scoped packages
/// (`@scope/name[/...]`) where it is the first two. Returns `None` for
/// non-package specifiers.
pub fn package_name(specifier: &str) -> Option<String> {
    if classify(specifier) != SpecifierKind::Package {
        return None;
    }
    let mut segments = specifier.split('/');
    let first = segments.next()?;
    if first.is_empty() {
        return None;
    }
    // Scheme-prefixed specifiers (`virtual:plugin`) are not valid package
    // names; the dependency analyzer reports them as unresolved instead.
    if first.contains(':') {
        return None;
    }
    if first.starts_with('@') {
        let second = segments.next()?;
        if second.is_empty() {
            return None;
        }
        return Some(format!("{}/{}", first, second));
    }
    Some(first.to_string())
}
