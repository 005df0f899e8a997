//! Incremental builder for the immutable syntax tree.

use text_size::{TextRange, TextSize};

use crate::green::{GreenElement, GreenNode, GreenToken, GreenTrivia};
use crate::{SyntaxKind, SyntaxTree};

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_TREE_SIZE: usize = 1024;

/// Builds a `SyntaxTree` from parser events.
///
/// Nodes are opened with [`Builder::start_node`], filled with tokens and
/// child nodes, and closed with [`Builder::finish_node`]. Children are kept
/// on a single stack and moved into their parent when it is finished.
pub struct Builder<'a> {
    text: &'a str,
    offset: TextSize,
    opened: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

impl<'a> Builder<'a> {
    /// Creates a new builder for `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: TextSize::new(0),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children: Vec::with_capacity(DEFAULT_TREE_SIZE),
        }
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.opened.push((kind, self.children.len()));
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.opened.pop().expect("no opened nodes?");
        let node = GreenNode::new(kind, self.children.drain(first_child..));
        self.children.push(node.into());
    }

    /// Adds a token with its leading and trailing trivia.
    ///
    /// `kind_range` is the absolute range of the token itself; the trivia
    /// lengths extend it on both sides and must line up with the text
    /// consumed so far.
    #[track_caller]
    pub fn token(
        &mut self,
        leading: GreenTrivia,
        kind: SyntaxKind,
        kind_range: TextRange,
        trailing: GreenTrivia,
    ) {
        let start = kind_range.start() - leading.len();
        let end = kind_range.end() + trailing.len();
        assert_eq!(start, self.offset, "tokens must be added in source order");

        let text = &self.text[TextRange::new(start, end)];
        self.offset = end;
        self.children.push(GreenToken::new(leading, kind, text, trailing).into());
    }

    /// Finishes building and returns the immutable `SyntaxTree`.
    #[track_caller]
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes");
        assert_eq!(usize::from(self.offset), self.text.len(), "tree does not cover the whole text");

        let mut children = std::mem::take(&mut self.children);
        assert_eq!(children.len(), 1, "expected a single root node");
        let root = match children.pop() {
            Some(GreenElement::Node(root)) => root,
            _ => panic!("the root must be a node"),
        };

        SyntaxTree::new(root, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TriviaPiece, TriviaPieceKind};

    #[test]
    fn builds_nested_nodes() {
        let text = "def A ;";
        let space = GreenTrivia::new(&[TriviaPiece::new(TriviaPieceKind::Whitespace, 1.into())]);

        let range = |start: u32, end: u32| TextRange::new(start.into(), end.into());
        let none = GreenTrivia::empty;

        let mut builder = Builder::new(text);
        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.start_node(SyntaxKind::DEF);
        builder.token(none(), SyntaxKind::DEF_KW, range(0, 3), space.clone());
        builder.start_node(SyntaxKind::IDENT);
        builder.token(none(), SyntaxKind::IDENTIFIER, range(4, 5), space);
        builder.finish_node();
        builder.token(none(), SyntaxKind::SEMICOLON, range(6, 7), none());
        builder.finish_node();
        builder.finish_node();

        let tree = builder.finish();
        let root = tree.root();
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
        assert_eq!(root.text(), text);

        let def = root.children().next().unwrap();
        assert_eq!(def.kind(), SyntaxKind::DEF);
        assert_eq!(def.children_with_tokens().count(), 3);
    }

    #[test]
    #[should_panic(expected = "tokens must be added in source order")]
    fn rejects_gaps() {
        let mut builder = Builder::new("a b");
        builder.start_node(SyntaxKind::SOURCE_FILE);
        let range = TextRange::new(2.into(), 3.into());
        builder.token(GreenTrivia::empty(), SyntaxKind::IDENTIFIER, range, GreenTrivia::empty());
    }
}
