//! Salsa queries over TableGen files and the include graph between them.

use std::collections::VecDeque;
use std::collections::hash_map::Entry;
use std::error::Error as _;

use camino::Utf8PathBuf;
use rustc_hash::FxHashMap;
use salsa::Accumulator as _;
pub use tablegen_errors::Diagnostic;
use tablegen_errors::{DiagnosticKind, Severity};
pub use tablegen_inputs::File;
use tablegen_inputs::IncludeResolver;
use tablegen_parse::FileParse as _;
use tablegen_syntax::ast::{self, Node as _};
use text_size::TextRange;

#[salsa::db]
#[derive(Clone, Default)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

/// An `include "name"` directive, with the range of its string literal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IncludeDirective {
    pub name: String,
    pub range: TextRange,
}

/// Include directives of `file` in source order, including those nested in
/// blocks.
#[salsa::tracked(returns(ref))]
pub fn includes(db: &dyn salsa::Database, file: File) -> Vec<IncludeDirective> {
    file.parse(db)
        .syntax()
        .descendants()
        .filter_map(ast::Include::cast)
        .filter_map(|include| {
            let path = include.path()?;
            Some(IncludeDirective { name: path.value(), range: path.syntax().trimmed_range() })
        })
        .collect()
}

/// Accumulates the lexical, syntax and structural diagnostics of `file`.
#[salsa::tracked]
pub fn check_file(db: &dyn salsa::Database, file: File) {
    for diagnostic in file.parse(db).diagnostics() {
        diagnostic.clone().accumulate(db);
    }
}

/// Files reachable from a root through `include` directives.
#[derive(Debug)]
pub struct IncludeGraph {
    files: Vec<File>,
    edges: Vec<(File, File)>,
    diagnostics: Vec<(File, Diagnostic)>,
}

impl IncludeGraph {
    pub fn root(&self) -> File {
        self.files[0]
    }

    /// Every loaded file, root first, in breadth-first order.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Files directly included by `file`, in directive order.
    pub fn included_by(&self, file: File) -> impl Iterator<Item = File> + '_ {
        self.edges.iter().filter(move |(from, _)| *from == file).map(|&(_, to)| to)
    }

    /// Includes that could not be resolved, keyed by the including file.
    pub fn diagnostics(&self) -> &[(File, Diagnostic)] {
        &self.diagnostics
    }
}

/// Walks the include graph from `root`, creating a [`File`] input for every
/// newly resolved file. Files are identified by
/// [`IncludeResolver::canonicalize`] and loaded once, so include cycles and
/// diamonds terminate.
pub fn load_includes(
    db: &dyn salsa::Database,
    root: File,
    resolver: &dyn IncludeResolver,
) -> IncludeGraph {
    let _span = tracing::info_span!("load_includes", root = %root.path(db)).entered();

    let mut graph = IncludeGraph { files: vec![root], edges: Vec::new(), diagnostics: Vec::new() };
    let mut loaded = FxHashMap::<Utf8PathBuf, File>::default();
    loaded.insert(resolver.canonicalize(root.path(db)), root);

    let mut queue = VecDeque::from([root]);
    while let Some(file) = queue.pop_front() {
        for include in includes(db, file) {
            let resolved = match resolver.resolve(file.path(db), &include.name) {
                Ok(resolved) => resolved,
                Err(err) => {
                    tracing::warn!(from = %file.path(db), name = %include.name, "{err}");
                    let message = match err.source() {
                        Some(source) => format!("{err}: {source}"),
                        None => err.to_string(),
                    };
                    let diagnostic = Diagnostic::new(
                        message,
                        include.range,
                        Severity::Error,
                        DiagnosticKind::Include,
                    );
                    graph.diagnostics.push((file, diagnostic));
                    continue;
                }
            };

            let target = match loaded.entry(resolver.canonicalize(&resolved.path)) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    tracing::debug!(path = %resolved.path, "loaded include");
                    let target = File::new(db, resolved.path, resolved.text);
                    graph.files.push(target);
                    queue.push_back(target);
                    *entry.insert(target)
                }
            };
            graph.edges.push((file, target));
        }
    }

    graph
}
