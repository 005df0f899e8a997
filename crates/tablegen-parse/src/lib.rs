//! Recursive-descent parser producing a lossless [`SyntaxTree`].
//!
//! Parsing never fails: malformed input still yields a tree covering every
//! byte of the source, with the problems reported as [`Diagnostic`]s.

use std::fmt::Write as _;

use tablegen_errors::Diagnostic;
use tablegen_inputs::File;
use tablegen_syntax::ast::{self, Node as _};
use tablegen_syntax::{SyntaxNode, SyntaxTree};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

pub fn parse(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::items::source_file(&mut parser);
    let (tree, diagnostics) = parser.finish();
    Parse { tree, diagnostics }
}

/// A syntax tree with the lexical and syntax diagnostics found while
/// building it, ordered by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn syntax(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn source_file(&self) -> ast::SourceFile<'_> {
        ast::SourceFile::cast(self.tree.root()).expect("the root node is always a source file")
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Tree dump followed by one line per diagnostic.
    pub fn debug_dump(&self) -> String {
        let mut out = self.tree.debug_dump();
        out.push_str("Errors:\n");
        for diagnostic in &self.diagnostics {
            _ = writeln!(
                out,
                "  {:?}@{:?} {}: {}",
                diagnostic.kind(),
                diagnostic.range(),
                diagnostic.severity(),
                diagnostic.message()
            );
        }
        out
    }
}

pub trait FileParse {
    fn parse(self, db: &dyn salsa::Database) -> &Parse;
}

#[salsa::tracked]
impl FileParse for File {
    #[salsa::tracked(returns(ref), no_eq)]
    fn parse(self, db: &dyn salsa::Database) -> Parse {
        crate::parse(self.text(db))
    }
}
