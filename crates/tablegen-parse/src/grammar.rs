use tablegen_syntax::SyntaxKind::{self, *};
use tablegen_syntax::SyntaxSet;

use crate::parser::Parser;

pub(crate) mod items;
mod types;
mod values;

/// A declared name: class, multiclass, field, template argument, variable.
pub(crate) fn name(p: &mut Parser<'_>, recovery: &SyntaxSet) {
    match p.peek_kind() {
        IDENTIFIER => {
            let m = p.start();
            p.advance();
            m.complete(p, NAME);
        }
        _ => p.error_recover("expected an identifier", recovery),
    }
}

/// Parses `bra element (delim element)* delim? ket`, where the list may
/// be empty. `element` returns `false` when nothing it recognizes starts at
/// the cursor.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut element: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            p.error_and_bump(unexpected_delim_message);
            continue;
        }

        if !element(p) {
            break;
        }

        if !p.eat(delim) {
            if p.at_set(first_set) {
                p.expect(delim);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}
