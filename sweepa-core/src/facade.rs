//! The compiler facade: the only interface the engine consumes.
//!
//! A front end digests each source file into [`ModuleFacts`] (declarations
//! with their body references, imports, re-exports, JSX tags) and answers
//! whole-program queries (`find_references`, `resolve_module`). The engine
//! never touches syntax trees directly, so any compiler that can produce
//! these facts can drive the analysis.
//!
//! [`MemoryFacade`] is the concrete implementation shipped with the crate:
//! an in-memory program model that deserializes from a JSON snapshot. It is
//! the CLI's input format and the test harness for the engine.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SweepaError, SweepaResult};

/// A 1-indexed source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for SourcePos {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Kind of a declaration (and of the graph node derived from it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Function,
    Class,
    Method,
    Property,
    Variable,
    Type,
    Interface,
    Enum,
    EnumMember,
    Namespace,
    Module,
    Parameter,
}

impl DeclKind {
    /// Type-only declarations exist only in the type system.
    pub fn is_type_only(&self) -> bool {
        matches!(self, Self::Type | Self::Interface)
    }

    /// Member declarations live inside a parent declaration.
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Method | Self::Property | Self::EnumMember)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Property => "property",
            Self::Variable => "variable",
            Self::Type => "type",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::EnumMember => "enum member",
            Self::Namespace => "namespace",
            Self::Module => "module",
            Self::Parameter => "parameter",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Kind of a reference edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Call,
    PropertyRead,
    PropertyWrite,
    TypeReference,
    Import,
    ReExport,
    Instantiation,
    Decorator,
    JsxElement,
    InterfaceImplementation,
}

impl Default for RefKind {
    fn default() -> Self {
        Self::Call
    }
}

/// An identifier referenced from a declaration body (or from the top-level
/// scope of a file, see [`ModuleFacts::module_refs`]).
///
/// `name` is the identifier as visible in the referencing scope: an import
/// alias, a local name, `Ns.member` for namespace-member access, or
/// `this.prop` for instance-property access inside a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRef {
    pub name: String,
    #[serde(default)]
    pub kind: RefKind,
    #[serde(default)]
    pub pos: SourcePos,
}

impl BodyRef {
    pub fn new(name: impl Into<String>, kind: RefKind, pos: SourcePos) -> Self {
        Self {
            name: name.into(),
            kind,
            pos,
        }
    }
}

/// A JSX element tag occurring in a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsxTag {
    pub name: String,
    #[serde(default)]
    pub pos: SourcePos,
}

/// One binding introduced by a parameter pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamBinding {
    pub name: String,
    /// Whether the binding's name is read anywhere in the body.
    #[serde(default)]
    pub read: bool,
}

/// A single parameter position, possibly destructured into several bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamPattern {
    pub bindings: Vec<ParamBinding>,
    /// Rest parameters (`...args`) are never reported.
    #[serde(default)]
    pub rest: bool,
    /// The parameter position is required by an interface signature or a
    /// typed target (callback assigned to a typed variable, etc.).
    #[serde(default)]
    pub signature_bound: bool,
    #[serde(default)]
    pub pos: SourcePos,
}

/// A declaration as digested by the front end.
///
/// `name` is the qualified name: a bare name for top-level declarations,
/// `Parent.child` for members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    #[serde(default)]
    pub exported: bool,
    #[serde(default)]
    pub default_export: bool,
    #[serde(default)]
    pub pos: SourcePos,
    /// Qualified name of the parent declaration in the same file.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub decorators: Vec<String>,
    #[serde(default)]
    pub body_refs: Vec<BodyRef>,
    #[serde(default)]
    pub jsx_tags: Vec<JsxTag>,
    #[serde(default)]
    pub params: Vec<ParamPattern>,
    /// For methods: the method is required by an implemented interface.
    #[serde(default)]
    pub satisfies_interface: bool,
    /// For methods: declared with an override modifier.
    #[serde(default)]
    pub is_override: bool,
    /// For properties: declared with an initializer (counts as a write).
    #[serde(default)]
    pub has_initializer: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            exported: false,
            default_export: false,
            pos: SourcePos::default(),
            parent: None,
            decorators: Vec::new(),
            body_refs: Vec::new(),
            jsx_tags: Vec::new(),
            params: Vec::new(),
            satisfies_interface: false,
            is_override: false,
            has_initializer: false,
        }
    }

    /// Top-level declarations have no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// The unqualified (last) segment of the name.
    pub fn local_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A named binding of an import declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedImport {
    /// The exported name in the target module.
    pub name: String,
    /// The local alias, if renamed (`import { a as b }`).
    #[serde(default)]
    pub alias: Option<String>,
    /// Imported with type-only syntax.
    #[serde(default)]
    pub type_only: bool,
}

impl NamedImport {
    /// The binding name visible in the importing file.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// An import declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Import {
    pub specifier: String,
    #[serde(default)]
    pub named: Vec<NamedImport>,
    #[serde(default)]
    pub default_binding: Option<String>,
    #[serde(default)]
    pub namespace_binding: Option<String>,
    /// The whole declaration uses type-only syntax (`import type { .. }`).
    #[serde(default)]
    pub type_only: bool,
    #[serde(default)]
    pub pos: SourcePos,
}

impl Import {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            named: Vec::new(),
            default_binding: None,
            namespace_binding: None,
            type_only: false,
            pos: SourcePos::default(),
        }
    }

    /// `import './module'` — imported for side effects only.
    pub fn side_effect_only(&self) -> bool {
        self.named.is_empty() && self.default_binding.is_none() && self.namespace_binding.is_none()
    }
}

/// One name carried by a re-export declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReExportName {
    /// The name presented to importers of this file.
    pub exported: String,
    /// The name in the origin module (differs under `export { a as b }`).
    pub origin: String,
    #[serde(default)]
    pub type_only: bool,
}

/// An export declaration: `export { a, b as c } from './x'`,
/// `export * from './y'`, or `export { local }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReExport {
    /// Absent for `export { local }` forwarding a binding of this file.
    #[serde(default)]
    pub specifier: Option<String>,
    #[serde(default)]
    pub names: Vec<ReExportName>,
    /// `export * from ...`
    #[serde(default)]
    pub star: bool,
    #[serde(default)]
    pub pos: SourcePos,
}

/// Everything the engine needs to know about one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleFacts {
    pub path: PathBuf,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub reexports: Vec<ReExport>,
    /// References made outside any declaration (top-level statements).
    #[serde(default)]
    pub module_refs: Vec<BodyRef>,
    /// JSX elements rendered outside any declaration.
    #[serde(default)]
    pub module_jsx: Vec<JsxTag>,
    /// The file shows dynamic access patterns (string-keyed lookup,
    /// non-literal dynamic import). Drops detector confidence to low.
    #[serde(default)]
    pub dynamic_access: bool,
}

impl ModuleFacts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            declarations: Vec::new(),
            imports: Vec::new(),
            reexports: Vec::new(),
            module_refs: Vec::new(),
            module_jsx: Vec::new(),
            dynamic_access: false,
        }
    }

    /// Find a declaration by qualified name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Find the default-exported declaration, if any.
    pub fn default_export(&self) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.default_export)
    }

    /// All import and re-export specifiers of this file.
    pub fn specifiers(&self) -> impl Iterator<Item = (&str, SourcePos)> {
        self.imports
            .iter()
            .map(|i| (i.specifier.as_str(), i.pos))
            .chain(
                self.reexports
                    .iter()
                    .filter_map(|r| r.specifier.as_deref().map(|s| (s, r.pos))),
            )
    }
}

/// A reference site reported by `find_references`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSite {
    pub file: PathBuf,
    pub pos: SourcePos,
    /// Distinguishes the definition site from true references.
    pub is_definition: bool,
    /// Qualified name of the innermost enclosing declaration, absent when the
    /// reference occurs at the top level of the file.
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub kind: RefKind,
}

/// The compiler facade interface (the only interface the core consumes).
pub trait CompilerFacade: Send + Sync {
    /// Every source file of the program, in a stable order.
    fn source_files(&self) -> Vec<PathBuf>;

    /// The digested facts for one file.
    fn module(&self, path: &Path) -> Option<&ModuleFacts>;

    /// Raw source text, where available (used by the ignore layer and the
    /// stylesheet scanner).
    fn source_text(&self, path: &Path) -> Option<&str>;

    /// Resolve a module specifier from a containing file, using the
    /// compiler's own resolution rules. `None` for builtins, virtual modules
    /// and anything the compiler cannot resolve.
    fn resolve_module(&self, specifier: &str, from: &Path) -> Option<PathBuf>;

    /// Every reference site of the symbol declared as `name` in `file`.
    fn find_references(&self, file: &Path, name: &str) -> SweepaResult<Vec<ReferenceSite>>;
}

// ============================================================================
// MemoryFacade
// ============================================================================

/// Serialized program model: what a front end hands to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    #[serde(default)]
    pub modules: Vec<ModuleFacts>,
    /// Raw text per file (source files, stylesheets).
    #[serde(default)]
    pub sources: BTreeMap<PathBuf, String>,
    /// Explicit resolution results: file -> specifier -> target path.
    /// Covers aliases, package entry points, anything the default relative
    /// resolution cannot derive.
    #[serde(default)]
    pub resolutions: BTreeMap<PathBuf, BTreeMap<String, PathBuf>>,
}

/// In-memory [`CompilerFacade`] built from a [`ProgramSnapshot`].
///
/// Relative specifiers resolve against the containing directory with the
/// usual extension and index candidates; everything else must appear in the
/// snapshot's explicit resolution table.
#[derive(Debug, Default)]
pub struct MemoryFacade {
    modules: HashMap<PathBuf, ModuleFacts>,
    sources: HashMap<PathBuf, String>,
    resolutions: HashMap<PathBuf, BTreeMap<String, PathBuf>>,
}

/// Extension candidates tried for a relative specifier, in order.
const RESOLVE_SUFFIXES: &[&str] = &[
    "", ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", "/index.ts", "/index.tsx", "/index.js",
];

impl MemoryFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ProgramSnapshot) -> Self {
        let mut facade = Self::new();
        for module in snapshot.modules {
            facade.add_module(module);
        }
        for (path, text) in snapshot.sources {
            facade.add_source(path, text);
        }
        for (from, table) in snapshot.resolutions {
            for (specifier, target) in table {
                facade.add_resolution(&from, specifier, target);
            }
        }
        facade
    }

    /// Decode a JSON snapshot (the CLI input format).
    pub fn from_json(path: &Path, text: &str) -> SweepaResult<Self> {
        let snapshot: ProgramSnapshot = serde_json::from_str(text)
            .map_err(|e| SweepaError::snapshot(path, e.to_string()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn add_module(&mut self, module: ModuleFacts) -> &mut Self {
        self.modules.insert(module.path.clone(), module);
        self
    }

    pub fn add_source(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> &mut Self {
        self.sources.insert(path.into(), text.into());
        self
    }

    pub fn add_resolution(
        &mut self,
        from: &Path,
        specifier: impl Into<String>,
        target: impl Into<PathBuf>,
    ) -> &mut Self {
        self.resolutions
            .entry(from.to_path_buf())
            .or_default()
            .insert(specifier.into(), target.into());
        self
    }

    fn known_path(&self, candidate: &Path) -> bool {
        self.modules.contains_key(candidate) || self.sources.contains_key(candidate)
    }

    /// Resolve a relative specifier against the containing directory,
    /// normalizing `.` and `..` segments lexically.
    fn resolve_relative(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        let base = from.parent()?;
        let mut segments: Vec<std::ffi::OsString> =
            base.components().map(|c| c.as_os_str().to_owned()).collect();
        for segment in specifier.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                other => segments.push(other.into()),
            }
        }
        let joined: PathBuf = segments.iter().collect();
        let joined = if specifier.starts_with('/') {
            PathBuf::from(specifier)
        } else {
            joined
        };
        let base_str = joined.to_string_lossy().into_owned();
        for suffix in RESOLVE_SUFFIXES {
            let candidate = PathBuf::from(format!("{}{}", base_str, suffix));
            if self.known_path(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Resolve an exported `name` of `target` to its defining declaration,
    /// chasing re-export chains (bounded by a visited set).
    fn resolve_export(
        &self,
        target: &Path,
        name: &str,
        visited: &mut HashSet<PathBuf>,
    ) -> Option<(PathBuf, String)> {
        if !visited.insert(target.to_path_buf()) {
            return None;
        }
        let module = self.modules.get(target)?;
        if name == "default" {
            if let Some(decl) = module.default_export() {
                return Some((target.to_path_buf(), decl.name.clone()));
            }
        }
        if module.declaration(name).is_some() {
            return Some((target.to_path_buf(), name.to_string()));
        }
        for re in &module.reexports {
            let Some(spec) = re.specifier.as_deref() else {
                // `export { local }` re-presents a binding of this file; if
                // the binding is itself an import the chain continues below.
                for n in &re.names {
                    if n.exported == name {
                        if let Some(resolved) = self.resolve_binding(module, &n.origin) {
                            return Some(resolved);
                        }
                    }
                }
                continue;
            };
            let Some(next) = self.resolve_module(spec, target) else {
                continue;
            };
            for n in &re.names {
                if n.exported == name {
                    if let Some(found) = self.resolve_export(&next, &n.origin, visited) {
                        return Some(found);
                    }
                }
            }
            if re.star {
                if let Some(found) = self.resolve_export(&next, name, visited) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Resolve a binding visible in `module` to its defining declaration.
    fn resolve_binding(&self, module: &ModuleFacts, name: &str) -> Option<(PathBuf, String)> {
        if name.starts_with("this.") {
            return None;
        }
        let (head, member) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };

        // Qualified local declaration (`Enum.Member`, `Class.method`).
        if member.is_some() && module.declaration(name).is_some() {
            return Some((module.path.clone(), name.to_string()));
        }
        if member.is_none() && module.declaration(head).is_some() {
            return Some((module.path.clone(), head.to_string()));
        }

        for import in &module.imports {
            let target = |f: &Self| f.resolve_module(&import.specifier, &module.path);
            for named in &import.named {
                if named.binding() == head {
                    let t = target(self)?;
                    let mut visited = HashSet::new();
                    return self.resolve_export(&t, &named.name, &mut visited);
                }
            }
            if import.default_binding.as_deref() == Some(head) {
                let t = target(self)?;
                let mut visited = HashSet::new();
                return self.resolve_export(&t, "default", &mut visited);
            }
            if import.namespace_binding.as_deref() == Some(head) {
                let t = target(self)?;
                return match member {
                    Some(m) => {
                        let mut visited = HashSet::new();
                        self.resolve_export(&t, m, &mut visited)
                    }
                    None => Some((t, crate::graph::MODULE_SYMBOL.to_string())),
                };
            }
        }
        None
    }
}

impl CompilerFacade for MemoryFacade {
    fn source_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.modules.keys().cloned().collect();
        files.sort();
        files
    }

    fn module(&self, path: &Path) -> Option<&ModuleFacts> {
        self.modules.get(path)
    }

    fn source_text(&self, path: &Path) -> Option<&str> {
        self.sources.get(path).map(|s| s.as_str())
    }

    fn resolve_module(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        if let Some(table) = self.resolutions.get(from) {
            if let Some(target) = table.get(specifier) {
                return Some(target.clone());
            }
        }
        if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
        {
            return self.resolve_relative(specifier, from);
        }
        None
    }

    fn find_references(&self, file: &Path, name: &str) -> SweepaResult<Vec<ReferenceSite>> {
        let target = (file.to_path_buf(), name.to_string());
        let mut sites = Vec::new();

        if let Some(module) = self.modules.get(file) {
            if let Some(decl) = module.declaration(name) {
                sites.push(ReferenceSite {
                    file: file.to_path_buf(),
                    pos: decl.pos,
                    is_definition: true,
                    container: None,
                    kind: RefKind::Call,
                });
            }
        }

        for module in self.modules.values() {
            for decl in &module.declarations {
                for body_ref in &decl.body_refs {
                    if self.resolve_binding(module, &body_ref.name) == Some(target.clone()) {
                        sites.push(ReferenceSite {
                            file: module.path.clone(),
                            pos: body_ref.pos,
                            is_definition: false,
                            container: Some(decl.name.clone()),
                            kind: body_ref.kind,
                        });
                    }
                }
                for tag in &decl.jsx_tags {
                    if self.resolve_binding(module, &tag.name) == Some(target.clone()) {
                        sites.push(ReferenceSite {
                            file: module.path.clone(),
                            pos: tag.pos,
                            is_definition: false,
                            container: Some(decl.name.clone()),
                            kind: RefKind::JsxElement,
                        });
                    }
                }
            }
            for body_ref in &module.module_refs {
                if self.resolve_binding(module, &body_ref.name) == Some(target.clone()) {
                    sites.push(ReferenceSite {
                        file: module.path.clone(),
                        pos: body_ref.pos,
                        is_definition: false,
                        container: None,
                        kind: body_ref.kind,
                    });
                }
            }
            for tag in &module.module_jsx {
                if self.resolve_binding(module, &tag.name) == Some(target.clone()) {
                    sites.push(ReferenceSite {
                        file: module.path.clone(),
                        pos: tag.pos,
                        is_definition: false,
                        container: None,
                        kind: RefKind::JsxElement,
                    });
                }
            }
            // Import bindings of the symbol count as reference sites.
            for import in &module.imports {
                let Some(t) = self.resolve_module(&import.specifier, &module.path) else {
                    continue;
                };
                let mut import_hits = false;
                for named in &import.named {
                    let mut visited = HashSet::new();
                    if self.resolve_export(&t, &named.name, &mut visited) == Some(target.clone()) {
                        import_hits = true;
                    }
                }
                if let Some(_default) = &import.default_binding {
                    let mut visited = HashSet::new();
                    if self.resolve_export(&t, "default", &mut visited) == Some(target.clone()) {
                        import_hits = true;
                    }
                }
                if import_hits {
                    sites.push(ReferenceSite {
                        file: module.path.clone(),
                        pos: import.pos,
                        is_definition: false,
                        container: None,
                        kind: RefKind::Import,
                    });
                }
            }
        }

        sites.sort_by(|a, b| (&a.file, a.pos).cmp(&(&b.file, b.pos)));
        Ok(sites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(path: &str) -> ModuleFacts {
        ModuleFacts::new(path)
    }

    fn exported_fn(name: &str) -> Declaration {
        let mut d = Declaration::new(name, DeclKind::Function);
        d.exported = true;
        d
    }

    #[test]
    fn test_resolve_relative_extension_candidates() {
        let mut facade = MemoryFacade::new();
        facade.add_module(facts("/proj/src/app.ts"));
        facade.add_module(facts("/proj/src/util.ts"));

        let resolved = facade.resolve_module("./util", Path::new("/proj/src/app.ts"));
        assert_eq!(resolved, Some(PathBuf::from("/proj/src/util.ts")));
    }

    #[test]
    fn test_resolve_relative_index() {
        let mut facade = MemoryFacade::new();
        facade.add_module(facts("/proj/src/app.ts"));
        facade.add_module(facts("/proj/src/lib/index.ts"));

        let resolved = facade.resolve_module("./lib", Path::new("/proj/src/app.ts"));
        assert_eq!(resolved, Some(PathBuf::from("/proj/src/lib/index.ts")));
    }

    #[test]
    fn test_resolve_parent_segments() {
        let mut facade = MemoryFacade::new();
        facade.add_module(facts("/proj/src/routes/home.ts"));
        facade.add_module(facts("/proj/src/util.ts"));

        let resolved = facade.resolve_module("../util", Path::new("/proj/src/routes/home.ts"));
        assert_eq!(resolved, Some(PathBuf::from("/proj/src/util.ts")));
    }

    #[test]
    fn test_package_specifier_needs_explicit_resolution() {
        let mut facade = MemoryFacade::new();
        facade.add_module(facts("/proj/src/app.ts"));
        assert_eq!(facade.resolve_module("react", Path::new("/proj/src/app.ts")), None);

        facade.add_resolution(
            Path::new("/proj/src/app.ts"),
            "react",
            "/proj/node_modules/react/index.js",
        );
        assert_eq!(
            facade.resolve_module("react", Path::new("/proj/src/app.ts")),
            Some(PathBuf::from("/proj/node_modules/react/index.js"))
        );
    }

    #[test]
    fn test_find_references_across_files() {
        let mut facade = MemoryFacade::new();

        let mut util = facts("/proj/src/util.ts");
        util.declarations.push(exported_fn("helper"));
        facade.add_module(util);

        let mut app = facts("/proj/src/app.ts");
        let mut import = Import::new("./util");
        import.named.push(NamedImport {
            name: "helper".into(),
            alias: None,
            type_only: false,
        });
        app.imports.push(import);
        let mut main = exported_fn("main");
        main.body_refs.push(BodyRef::new(
            "helper",
            RefKind::Call,
            SourcePos::new(3, 5),
        ));
        app.declarations.push(main);
        facade.add_module(app);

        let sites = facade
            .find_references(Path::new("/proj/src/util.ts"), "helper")
            .unwrap();
        let refs: Vec<_> = sites.iter().filter(|s| !s.is_definition).collect();
        assert_eq!(refs.len(), 2); // the import binding and the call
        assert!(refs
            .iter()
            .any(|s| s.container.as_deref() == Some("main") && s.kind == RefKind::Call));
    }

    #[test]
    fn test_resolve_export_through_reexport_chain() {
        let mut facade = MemoryFacade::new();

        let mut c = facts("/proj/src/c.ts");
        c.declarations.push(exported_fn("origin"));
        facade.add_module(c);

        let mut b = facts("/proj/src/b.ts");
        b.reexports.push(ReExport {
            specifier: Some("./c".into()),
            names: vec![ReExportName {
                exported: "origin".into(),
                origin: "origin".into(),
                type_only: false,
            }],
            star: false,
            pos: SourcePos::default(),
        });
        facade.add_module(b);

        let mut a = facts("/proj/src/a.ts");
        a.reexports.push(ReExport {
            specifier: Some("./b".into()),
            names: Vec::new(),
            star: true,
            pos: SourcePos::default(),
        });
        facade.add_module(a);

        let mut visited = HashSet::new();
        let resolved = facade.resolve_export(Path::new("/proj/src/a.ts"), "origin", &mut visited);
        assert_eq!(
            resolved,
            Some((PathBuf::from("/proj/src/c.ts"), "origin".to_string()))
        );
    }

    #[test]
    fn test_reexport_cycle_terminates() {
        let mut facade = MemoryFacade::new();

        let mut a = facts("/proj/src/a.ts");
        a.reexports.push(ReExport {
            specifier: Some("./b".into()),
            names: Vec::new(),
            star: true,
            pos: SourcePos::default(),
        });
        facade.add_module(a);

        let mut b = facts("/proj/src/b.ts");
        b.reexports.push(ReExport {
            specifier: Some("./a".into()),
            names: Vec::new(),
            star: true,
            pos: SourcePos::default(),
        });
        facade.add_module(b);

        let mut visited = HashSet::new();
        assert_eq!(
            facade.resolve_export(Path::new("/proj/src/a.ts"), "ghost", &mut visited),
            None
        );
    }
}
