use tablegen_errors::Diagnostic;
use tablegen_syntax::SyntaxKind::{self, *};
use tablegen_syntax::{BangOperator, SyntaxSet};

use super::delimited;
use super::types::type_annotation;
use crate::parser::{CompletedMarker, Parser};

/// Record names are values, but a `{` after them opens the record body
/// rather than a sequence or bit slice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ValueMode {
    Value,
    Name,
}

pub(crate) const VALUE_FIRST: SyntaxSet = SyntaxSet::new([
    INTEGER_LITERAL,
    DOUBLE_QUOTE,
    CODE_BLOCK,
    TRUE_KW,
    FALSE_KW,
    QUESTION,
    LEFT_BRACE,
    LEFT_BRACKET,
    LEFT_PAREN,
    IDENTIFIER,
    BANG_OPERATOR,
    COND_OPERATOR,
    EXCLAMATION,
]);

pub(crate) fn at_value_start(p: &Parser<'_>, mode: ValueMode) -> bool {
    match mode {
        ValueMode::Value => p.at_set(&VALUE_FIRST),
        ValueMode::Name => p.at_set(&VALUE_FIRST) && !p.at(LEFT_BRACE),
    }
}

/// `value := suffixed_value ('#' value?)?`
///
/// Paste is the loosest binding form and nests to the right, so
/// `A#B#C` is `A#(B#C)`.
pub(crate) fn value(p: &mut Parser<'_>, mode: ValueMode) -> Option<CompletedMarker> {
    if !at_value_start(p, mode) {
        p.error("expected a value");
        return None;
    }

    let lhs = suffixed_value(p, mode)?;
    if !p.at(HASH) {
        return Some(lhs);
    }

    let m = lhs.precede(p);
    p.advance();
    if at_value_start(p, mode) {
        value(p, mode);
    }
    Some(m.complete(p, PASTE_VALUE))
}

fn suffixed_value(p: &mut Parser<'_>, mode: ValueMode) -> Option<CompletedMarker> {
    let mut lhs = simple_value(p)?;

    loop {
        let (suffix, ket) = match p.peek_kind() {
            LEFT_BRACE if mode == ValueMode::Value => (BIT_SLICE, RIGHT_BRACE),
            LEFT_BRACKET => (LIST_SLICE, RIGHT_BRACKET),
            DOT => (FIELD_ACCESS, EOF),
            _ => return Some(lhs),
        };

        let m = lhs.precede(p);
        let s = p.start();
        p.advance();
        if suffix == FIELD_ACCESS {
            if !p.eat(IDENTIFIER) {
                p.error("expected a field name");
            }
        } else {
            range_list(p);
            p.expect(ket);
        }
        s.complete(p, suffix);
        lhs = m.complete(p, SUFFIXED_VALUE);
    }
}

fn simple_value(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.peek_kind() {
        DOUBLE_QUOTE => return Some(strings(p)),
        EXCLAMATION => return Some(unknown_bang(p)),
        _ => {}
    }

    let m = p.start();
    let kind = match p.peek_kind() {
        INTEGER_LITERAL => {
            p.advance();
            INTEGER
        }
        CODE_BLOCK => {
            p.advance();
            CODE
        }
        TRUE_KW | FALSE_KW => {
            p.advance();
            BOOLEAN
        }
        QUESTION => {
            p.advance();
            UNINITIALIZED
        }
        LEFT_BRACE => {
            sequence(p);
            SEQUENCE
        }
        LEFT_BRACKET => {
            value_list(p, LEFT_BRACKET, RIGHT_BRACKET);
            if p.at(LEFT_ANGLE) {
                type_annotation(p);
            }
            LIST_INIT
        }
        LEFT_PAREN => {
            dag_init(p);
            DAG_INIT
        }
        IDENTIFIER => {
            p.advance();
            if p.at(LEFT_ANGLE) {
                arg_list(p, LEFT_ANGLE, RIGHT_ANGLE);
                ANONYMOUS_RECORD
            } else {
                IDENT
            }
        }
        BANG_OPERATOR => {
            p.advance();
            if p.at(LEFT_ANGLE) {
                type_annotation(p);
            }
            if p.at(LEFT_PAREN) {
                arg_list(p, LEFT_PAREN, RIGHT_PAREN);
            } else {
                p.error("expected `(`");
            }
            BANG_OPERATION
        }
        COND_OPERATOR => {
            p.advance();
            if p.at(LEFT_PAREN) {
                delimited(
                    p,
                    LEFT_PAREN,
                    RIGHT_PAREN,
                    COMMA,
                    "expected a condition",
                    &VALUE_FIRST,
                    cond_clause,
                );
            } else {
                p.error("expected `(`");
            }
            COND_OPERATION
        }
        _ => {
            m.abandon(p);
            p.error("expected a value");
            return None;
        }
    };
    Some(m.complete(p, kind))
}

pub(crate) fn string(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert_eq!(p.peek_kind(), DOUBLE_QUOTE);

    let m = p.start();
    p.advance();
    while matches!(p.peek_kind(), STRING_CONTENT | ESCAPE_SEQUENCE) {
        p.advance();
    }
    // A missing closing quote has already been reported by the tokenizer.
    p.eat(DOUBLE_QUOTE);
    m.complete(p, STRING)
}

/// One string, or several adjacent ones concatenated.
pub(crate) fn strings(p: &mut Parser<'_>) -> CompletedMarker {
    let first = string(p);
    if !p.at(DOUBLE_QUOTE) {
        return first;
    }

    let m = first.precede(p);
    while p.at(DOUBLE_QUOTE) {
        string(p);
    }
    m.complete(p, CONCATENATED_STRING)
}

fn sequence(p: &mut Parser<'_>) {
    let open = p.peek_range();
    let mut count = 0;
    delimited(p, LEFT_BRACE, RIGHT_BRACE, COMMA, "expected a value", &VALUE_FIRST, |p| {
        let parsed = p.at_set(&VALUE_FIRST) && value(p, ValueMode::Value).is_some();
        count += usize::from(parsed);
        parsed
    });
    if count == 0 {
        p.push_diagnostic(Diagnostic::syntax("a sequence needs at least one value", open));
    }
}

fn value_list(p: &mut Parser<'_>, bra: SyntaxKind, ket: SyntaxKind) {
    delimited(p, bra, ket, COMMA, "expected a value", &VALUE_FIRST, |p| {
        p.at_set(&VALUE_FIRST) && value(p, ValueMode::Value).is_some()
    });
}

pub(crate) fn arg_list(p: &mut Parser<'_>, bra: SyntaxKind, ket: SyntaxKind) {
    let m = p.start();
    value_list(p, bra, ket);
    m.complete(p, ARG_LIST);
}

fn cond_clause(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&VALUE_FIRST) {
        return false;
    }

    let m = p.start();
    value(p, ValueMode::Value);
    p.expect(COLON);
    value(p, ValueMode::Value);
    m.complete(p, COND_CLAUSE);
    true
}

/// `'(' dag_arg (','? dag_arg)* ','? ')'`; the first argument is the
/// operator.
fn dag_init(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), LEFT_PAREN);
    p.advance();

    if !dag_arg(p) {
        p.error("expected a dag operator");
    }

    while !p.at(RIGHT_PAREN) && !p.at(EOF) {
        p.eat(COMMA);
        if p.at(RIGHT_PAREN) || !dag_arg(p) {
            break;
        }
    }

    p.expect(RIGHT_PAREN);
}

fn dag_arg(p: &mut Parser<'_>) -> bool {
    if p.at(VAR_NAME) {
        let m = p.start();
        p.advance();
        m.complete(p, DAG_ARG);
        return true;
    }
    if !p.at_set(&VALUE_FIRST) {
        return false;
    }

    let m = p.start();
    value(p, ValueMode::Value);
    if p.eat(COLON) && !p.eat(VAR_NAME) {
        p.error("expected a `$name` after `:`");
    }
    m.complete(p, DAG_ARG);
    true
}

/// A `!` the tokenizer could not glue to a known operator name. The `!` and
/// the following name become one `ERROR` node; an argument list after it is
/// still parsed so that one bad name does not cascade.
fn unknown_bang(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert_eq!(p.peek_kind(), EXCLAMATION);

    let m = p.start();
    let bang = p.peek_range();
    p.advance();

    let name = (p.at(IDENTIFIER) || p.peek_kind().is_keyword()).then(|| p.peek_text());
    let (message, range) = match name {
        Some(name) if name == "cond" || BangOperator::from_name(name).is_some() => {
            (format!("unexpected whitespace between `!` and `{name}`"), bang.cover(p.peek_range()))
        }
        Some(name) => (format!("unknown bang operator `!{name}`"), bang.cover(p.peek_range())),
        None => ("expected an operator name after `!`".to_owned(), bang),
    };
    p.push_diagnostic(Diagnostic::syntax(message, range));
    if name.is_some() {
        p.advance();
    }
    let error = m.complete(p, ERROR);

    if !matches!(p.peek_kind(), LEFT_ANGLE | LEFT_PAREN) {
        return error;
    }
    let m = error.precede(p);
    if p.at(LEFT_ANGLE) {
        type_annotation(p);
    }
    if p.at(LEFT_PAREN) {
        arg_list(p, LEFT_PAREN, RIGHT_PAREN);
    }
    m.complete(p, BANG_OPERATION)
}

/// `range_piece (',' range_piece)*`
pub(crate) fn range_list(p: &mut Parser<'_>) {
    if !p.at_set(&VALUE_FIRST) {
        p.error("expected a range");
        return;
    }

    let m = p.start();
    while range_piece(p) && p.eat(COMMA) {}
    m.complete(p, RANGE_LIST);
}

/// `value ('...' value | '-' value)?`. A negative literal directly after
/// the start (`0 -3`) is read as a dash range, with a warning.
pub(crate) fn range_piece(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&VALUE_FIRST) {
        p.error("expected a value");
        return false;
    }

    let m = p.start();
    value(p, ValueMode::Value);
    match p.peek_kind() {
        ELLIPSIS | MINUS => {
            p.advance();
            value(p, ValueMode::Value);
        }
        INTEGER_LITERAL if p.peek_text().starts_with('-') => {
            p.push_diagnostic(
                Diagnostic::syntax(
                    "negative literal read as the end of a range; write `a...b` instead",
                    p.peek_range(),
                )
                .warning(),
            );
            let end = p.start();
            p.advance();
            end.complete(p, INTEGER);
        }
        _ => {}
    }
    m.complete(p, RANGE_PIECE);
    true
}
