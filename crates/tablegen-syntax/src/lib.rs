//! Lossless, immutable syntax tree for TableGen sources.
//!
//! Every token owns its leading and trailing trivia, so concatenating the
//! token texts of a tree reproduces the input exactly. Nodes are navigated
//! through lifetime-bound, offset-carrying handles without refcounting.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod bang;
mod builder;
mod cursor;
mod green;
mod parent_map;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Built-in `!operator` names.
pub use bang::BangOperator;
/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Preorder traversal adapters.
pub use cursor::{Preorder, PreorderWithTokens, WalkEvent, WalkEventWithTokens};
/// Shareable, position-independent tree storage.
pub use green::{GreenElement, GreenNode, GreenToken, GreenTrivia};
/// Upward navigation index.
pub use parent_map::ParentMap;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTree, Trivia,
    TriviaIter,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::{Supertype, SyntaxKind};
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
