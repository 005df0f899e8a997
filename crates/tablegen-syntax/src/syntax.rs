//! Public syntax tree API: an owned tree plus borrowed, offset-carrying
//! handles for navigation.

use std::fmt;

use text_size::{TextRange, TextSize};

use crate::cursor::{Preorder, PreorderWithTokens, WalkEvent, WalkEventWithTokens};
use crate::green::{GreenElement, GreenNode, GreenToken, GreenTrivia};
use crate::{SyntaxKind, TriviaPieceKind};

/// Owned syntax tree for a single source text.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: GreenNode,
    text: Box<str>,
}

impl SyntaxTree {
    pub(crate) fn new(root: GreenNode, text: &str) -> Self {
        Self { root, text: text.into() }
    }

    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { green: &self.root, offset: TextSize::new(0), source: &self.text }
    }

    /// Returns the green root, shareable across threads.
    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.root
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Indented dump of every node and non-trivia token.
    pub fn debug_dump(&self) -> String {
        self.root().debug_dump()
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree").field("text_len", &self.text().len()).finish_non_exhaustive()
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    green: &'a GreenNode,
    offset: TextSize,
    source: &'a str,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.green, other.green) && self.offset == other.offset
    }
}

impl Eq for SyntaxNode<'_> {}

impl std::hash::Hash for SyntaxNode<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.green, state);
        self.offset.hash(state);
    }
}

impl<'a> SyntaxNode<'a> {
    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.green.kind()
    }

    #[inline]
    pub fn green(self) -> &'a GreenNode {
        self.green
    }

    /// Returns the text range covered by this node, trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    /// Returns the range with leading/trailing trivia trimmed away.
    pub fn trimmed_range(self) -> TextRange {
        let mut tokens = self.tokens();
        match tokens.next() {
            Some(first) => {
                let last = tokens.last().unwrap_or(first);
                TextRange::new(first.trimmed_range().start(), last.trimmed_range().end())
            }
            None => TextRange::empty(self.offset),
        }
    }

    /// Returns the text slice covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.source[self.text_range()]
    }

    /// Returns the text slice excluding leading/trailing trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.source[self.trimmed_range()]
    }

    /// Iterates children including tokens.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens {
            children: self.green.children().iter(),
            offset: self.offset,
            source: self.source,
        }
    }

    /// Iterates child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// Returns the first direct child node of the given kind.
    pub fn child_by_kind(self, kind: SyntaxKind) -> Option<SyntaxNode<'a>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Returns the first direct child token of the given kind.
    pub fn token_by_kind(self, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .find(|token| token.kind() == kind)
    }

    /// Returns the first token in this subtree.
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        self.tokens().next()
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }

    /// Iterates this node and all of its descendant nodes in preorder.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Iterates all tokens of this subtree in source order.
    pub fn tokens(self) -> impl Iterator<Item = SyntaxToken<'a>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::Token(token) => Some(token),
            _ => None,
        })
    }

    /// Indented dump of this subtree: one line per node and one per
    /// non-trivia token, tokens shown with their trimmed text.
    pub fn debug_dump(self) -> String {
        let mut out = String::new();
        dump(self, 0, &mut out);
        out
    }
}

fn dump(node: SyntaxNode<'_>, depth: usize, out: &mut String) {
    use std::fmt::Write as _;

    _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = depth * 2);
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(child) => dump(child, depth + 1, out),
            NodeOrToken::Token(token) if token.kind() == SyntaxKind::EOF => {}
            NodeOrToken::Token(token) => {
                _ = writeln!(
                    out,
                    "{:indent$}{:?} {:?}",
                    "",
                    token.kind(),
                    token.text_trimmed(),
                    indent = (depth + 1) * 2
                );
            }
        }
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    green: &'a GreenToken,
    offset: TextSize,
    source: &'a str,
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.green, other.green) && self.offset == other.offset
    }
}

impl Eq for SyntaxToken<'_> {}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.green.kind()
    }

    #[inline]
    pub fn green(self) -> &'a GreenToken {
        self.green
    }

    /// Returns the token text range including attached trivia.
    #[inline]
    pub fn text_range(self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    /// Returns the token text range excluding trivia.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        let range = self.text_range();
        TextRange::new(
            range.start() + self.green.leading().len(),
            range.end() - self.green.trailing().len(),
        )
    }

    /// Returns the token text including trivia.
    #[inline]
    pub fn text(self) -> &'a str {
        self.green.text()
    }

    /// Returns the token text excluding trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        self.green.text_trimmed()
    }

    /// Iterates over leading trivia.
    pub fn leading_trivia(self) -> TriviaIter<'a> {
        TriviaIter::new(self.green.leading(), self.offset, self.source)
    }

    /// Iterates over trailing trivia.
    pub fn trailing_trivia(self) -> TriviaIter<'a> {
        let start = self.trimmed_range().end();
        TriviaIter::new(self.green.trailing(), start, self.source)
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.trimmed_range(), self.text_trimmed())
    }
}

/// A piece of trivia with its absolute position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trivia<'a> {
    pub kind: TriviaPieceKind,
    pub range: TextRange,
    pub text: &'a str,
}

impl Trivia<'_> {
    pub fn syntax_kind(&self) -> SyntaxKind {
        self.kind.syntax_kind()
    }
}

/// Iterator over trivia pieces.
#[derive(Clone)]
pub struct TriviaIter<'a> {
    pieces: std::slice::Iter<'a, crate::TriviaPiece>,
    offset: TextSize,
    source: &'a str,
}

impl<'a> TriviaIter<'a> {
    fn new(trivia: &'a GreenTrivia, offset: TextSize, source: &'a str) -> Self {
        Self { pieces: trivia.pieces().iter(), offset, source }
    }
}

impl<'a> Iterator for TriviaIter<'a> {
    type Item = Trivia<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let piece = self.pieces.next()?;
        let range = TextRange::at(self.offset, piece.len);
        self.offset = range.end();
        Some(Trivia { kind: piece.kind, range, text: &self.source[range] })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pieces.size_hint()
    }
}

impl ExactSizeIterator for TriviaIter<'_> {}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl SyntaxElement<'_> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }
}

/// Iterator over children including tokens.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    children: std::slice::Iter<'a, GreenElement>,
    offset: TextSize,
    source: &'a str,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        let offset = self.offset;
        self.offset += child.text_len();

        let source = self.source;
        Some(match child {
            NodeOrToken::Node(green) => NodeOrToken::Node(SyntaxNode { green, offset, source }),
            NodeOrToken::Token(green) => NodeOrToken::Token(SyntaxToken { green, offset, source }),
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}
