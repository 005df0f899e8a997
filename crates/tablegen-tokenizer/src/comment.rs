//! Multi-line comment scanning.
//!
//! Block comments do not nest and cannot be described by a regular token
//! rule that also reports missing terminators, so they are scanned by hand.
//! The scanner keeps no state between calls.

/// Outcome of scanning one `/* ... */` comment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockComment {
    /// Byte offset just past the comment.
    pub end: usize,
    /// `false` when input ended before `*/`.
    pub terminated: bool,
}

/// Scans a block comment starting at `offset`.
///
/// Returns `None` unless `/*` starts exactly at `offset`. Otherwise the
/// comment ends just past the first `*/`, or at end of input if there is
/// none.
pub fn scan_block_comment(text: &str, offset: usize) -> Option<BlockComment> {
    let rest = text.get(offset..)?;
    let body = rest.strip_prefix("/*")?;

    Some(match body.find("*/") {
        Some(close) => BlockComment { end: offset + 2 + close + 2, terminated: true },
        None => BlockComment { end: text.len(), terminated: false },
    })
}
