//! Trivia pieces attached to tokens.

use text_size::TextSize;

use crate::SyntaxKind;

/// Kinds of trivia stored alongside tokens.
///
/// These are the grammar's "extras": accepted between any two tokens and
/// ignored by the grammar rules, but kept so the tree reproduces its text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    SingleLineComment,
    MultiLineComment,
    PreprocessorDirective,
}

impl TriviaPieceKind {
    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            TriviaPieceKind::Whitespace => SyntaxKind::WHITESPACE,
            TriviaPieceKind::SingleLineComment => SyntaxKind::LINE_COMMENT,
            TriviaPieceKind::MultiLineComment => SyntaxKind::BLOCK_COMMENT,
            TriviaPieceKind::PreprocessorDirective => SyntaxKind::PREPROCESSOR_DIRECTIVE,
        }
    }
}

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and length.
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}
