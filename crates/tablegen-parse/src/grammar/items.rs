use tablegen_errors::Diagnostic;
use tablegen_syntax::SyntaxKind::*;
use tablegen_syntax::SyntaxSet;

use super::types::{TYPE_FIRST, type_};
use super::values::{ValueMode, arg_list, at_value_start, range_list, range_piece, string, value};
use super::{delimited, name};
use crate::parser::{CompletedMarker, Parser};

/// Multiclass bodies only admit a subset of statements, and the
/// restriction carries into nested `foreach`, `if` and `let` blocks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StatementContext {
    TopLevel,
    Multiclass,
}

const STATEMENT_FIRST: SyntaxSet = SyntaxSet::new([
    ASSERT_KW,
    CLASS_KW,
    DEF_KW,
    DEFM_KW,
    DEFSET_KW,
    DEFVAR_KW,
    FOREACH_KW,
    IF_KW,
    INCLUDE_KW,
    LET_KW,
    MULTICLASS_KW,
]);

const NOT_IN_MULTICLASS: SyntaxSet =
    SyntaxSet::new([CLASS_KW, DEFSET_KW, INCLUDE_KW, MULTICLASS_KW]);

/// Keywords that can start a record body item. Identifiers also start
/// fields (as class types) but are too common to resynchronize on.
const BODY_KEYWORDS: SyntaxSet = SyntaxSet::new([
    ASSERT_KW, BIT_KW, BITS_KW, CODE_KW, DAG_KW, DEFVAR_KW, FIELD_KW, INT_KW, LET_KW, LIST_KW,
    STRING_KW,
]);

/// Statement keywords that never start a body item. Reaching one inside a
/// record body means its `}` is missing.
const STATEMENT_ONLY: SyntaxSet = SyntaxSet::new([
    CLASS_KW,
    DEF_KW,
    DEFM_KW,
    DEFSET_KW,
    FOREACH_KW,
    IF_KW,
    INCLUDE_KW,
    MULTICLASS_KW,
]);

const NAME_RECOVERY: SyntaxSet = SyntaxSet::new([
    EQ,
    SEMICOLON,
    COLON,
    COMMA,
    LEFT_ANGLE,
    RIGHT_ANGLE,
    LEFT_BRACE,
    RIGHT_BRACE,
    IN_KW,
])
.union(&STATEMENT_FIRST);

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        if !statement(p, StatementContext::TopLevel) {
            recover_statement(p, false);
        }
    }

    p.eof();
    m.complete(p, SOURCE_FILE);
}

/// Statements up to, but not including, the closing `}`.
fn statements(p: &mut Parser<'_>, context: StatementContext) {
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if !statement(p, context) {
            recover_statement(p, true);
        }
    }
}

/// Returns `false`, consuming nothing, when no statement starts here.
fn statement(p: &mut Parser<'_>, context: StatementContext) -> bool {
    if !p.at_set(&STATEMENT_FIRST) {
        return false;
    }

    if context == StatementContext::Multiclass && p.at_set(&NOT_IN_MULTICLASS) {
        let keyword = p.peek_text();
        let range = p.peek_range();
        let statement = statement_kind(p, StatementContext::TopLevel);
        statement.precede(p).complete(p, ERROR);
        p.push_diagnostic(Diagnostic::structural(
            format!("`{keyword}` is not allowed inside a multiclass"),
            range,
        ));
        return true;
    }

    statement_kind(p, context);
    true
}

fn statement_kind(p: &mut Parser<'_>, context: StatementContext) -> CompletedMarker {
    match p.peek_kind() {
        ASSERT_KW => assert(p),
        CLASS_KW => class(p),
        DEF_KW => def(p),
        DEFM_KW => defm(p),
        DEFSET_KW => defset(p, context),
        DEFVAR_KW => defvar(p),
        FOREACH_KW => foreach(p, context),
        IF_KW => if_(p, context),
        INCLUDE_KW => include(p),
        LET_KW => let_(p, context),
        MULTICLASS_KW => multiclass(p),
        _ => unreachable!("statement_kind called off a statement keyword"),
    }
}

/// Skips to the next statement keyword outside any braces, or to an
/// unbalanced `}` when inside a block. The skipped tokens become one
/// `ERROR` node.
fn recover_statement(p: &mut Parser<'_>, in_block: bool) {
    let m = p.start();
    p.error("expected a statement");

    let mut depth = 0usize;
    loop {
        match p.peek_kind() {
            EOF => break,
            RIGHT_BRACE if depth == 0 && in_block => break,
            RIGHT_BRACE => depth = depth.saturating_sub(1),
            LEFT_BRACE => depth += 1,
            kind if depth == 0 && STATEMENT_FIRST.contains(kind) => break,
            _ => {}
        }
        p.advance();
    }

    m.complete(p, ERROR);
}

fn class(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    name(p, &NAME_RECOVERY);
    template_args(p);
    record_body(p);
    m.complete(p, CLASS)
}

fn template_args(p: &mut Parser<'_>) {
    if !p.at(LEFT_ANGLE) {
        return;
    }

    let m = p.start();
    delimited(
        p,
        LEFT_ANGLE,
        RIGHT_ANGLE,
        COMMA,
        "expected a template argument",
        &TYPE_FIRST,
        template_arg,
    );
    m.complete(p, TEMPLATE_ARGS);
}

fn template_arg(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&TYPE_FIRST) {
        return false;
    }

    let m = p.start();
    type_(p);
    name(p, &NAME_RECOVERY);
    if p.eat(EQ) {
        value(p, ValueMode::Value);
    }
    m.complete(p, TEMPLATE_ARG);
    true
}

fn record_body(p: &mut Parser<'_>) {
    if !matches!(p.peek_kind(), COLON | SEMICOLON | LEFT_BRACE) {
        p.error("expected `:`, `;` or `{`");
        return;
    }

    let m = p.start();
    if p.at(COLON) {
        parent_class_list(p);
    }
    body(p);
    m.complete(p, RECORD_BODY);
}

fn parent_class_list(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), COLON);

    let m = p.start();
    p.advance();
    loop {
        if !parent_class(p) {
            p.error("expected a class name");
            break;
        }
        if !p.eat(COMMA) {
            break;
        }
    }
    m.complete(p, PARENT_CLASS_LIST);
}

fn parent_class(p: &mut Parser<'_>) -> bool {
    if !p.at(IDENTIFIER) {
        return false;
    }

    let m = p.start();
    p.advance();
    if p.at(LEFT_ANGLE) {
        arg_list(p, LEFT_ANGLE, RIGHT_ANGLE);
    }
    m.complete(p, PARENT_CLASS);
    true
}

fn body(p: &mut Parser<'_>) {
    let m = p.start();
    match p.peek_kind() {
        SEMICOLON => p.advance(),
        LEFT_BRACE => {
            p.advance();
            while !p.at(RIGHT_BRACE) && !p.at(EOF) && !p.at_set(&STATEMENT_ONLY) {
                if !body_item(p) {
                    recover_body_item(p);
                }
            }
            p.expect(RIGHT_BRACE);
        }
        _ => {
            m.abandon(p);
            p.error("expected `;` or `{`");
            return;
        }
    }
    m.complete(p, BODY);
}

fn body_item(p: &mut Parser<'_>) -> bool {
    match p.peek_kind() {
        LET_KW => {
            let_instruction(p);
        }
        DEFVAR_KW => {
            defvar(p);
        }
        ASSERT_KW => {
            assert(p);
        }
        FIELD_KW => field(p),
        kind if TYPE_FIRST.contains(kind) => field(p),
        _ => return false,
    }
    true
}

/// Skips past the next `;`, or up to `}` or a keyword that starts a body
/// item or a statement.
fn recover_body_item(p: &mut Parser<'_>) {
    let m = p.start();
    p.error("expected a field, `let`, `defvar` or `assert`");

    loop {
        let kind = p.peek_kind();
        p.advance();
        if kind == SEMICOLON
            || p.at(EOF)
            || p.at(RIGHT_BRACE)
            || p.at_set(&BODY_KEYWORDS)
            || p.at_set(&STATEMENT_ONLY)
        {
            break;
        }
    }

    m.complete(p, ERROR);
}

fn field(p: &mut Parser<'_>) {
    let m = p.start();
    p.eat(FIELD_KW);
    type_(p);
    name(p, &NAME_RECOVERY);
    if p.eat(EQ) {
        value(p, ValueMode::Value);
    }
    p.expect(SEMICOLON);
    m.complete(p, FIELD);
}

fn let_instruction(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    name(p, &NAME_RECOVERY);
    if p.eat(LEFT_BRACE) {
        range_list(p);
        p.expect(RIGHT_BRACE);
    }
    p.expect(EQ);
    value(p, ValueMode::Value);
    p.expect(SEMICOLON);
    m.complete(p, LET_INSTRUCTION)
}

fn def(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    if at_value_start(p, ValueMode::Name) {
        value(p, ValueMode::Name);
    }
    record_body(p);
    m.complete(p, DEF)
}

fn defm(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    if at_value_start(p, ValueMode::Name) {
        value(p, ValueMode::Name);
    }
    if p.at(COLON) {
        parent_class_list(p);
    }
    p.expect(SEMICOLON);
    m.complete(p, DEFM)
}

fn defset(p: &mut Parser<'_>, context: StatementContext) -> CompletedMarker {
    let m = p.start();
    p.advance();
    type_(p);
    name(p, &NAME_RECOVERY);
    p.expect(EQ);
    if p.expect(LEFT_BRACE) {
        statements(p, context);
        p.expect(RIGHT_BRACE);
    }
    m.complete(p, DEFSET)
}

fn defvar(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    name(p, &NAME_RECOVERY);
    p.expect(EQ);
    value(p, ValueMode::Value);
    p.expect(SEMICOLON);
    m.complete(p, DEFVAR)
}

fn foreach(p: &mut Parser<'_>, context: StatementContext) -> CompletedMarker {
    let m = p.start();
    p.advance();

    let iterator = p.start();
    name(p, &NAME_RECOVERY);
    p.expect(EQ);
    if p.eat(LEFT_BRACE) {
        range_list(p);
        p.expect(RIGHT_BRACE);
    } else {
        range_piece(p);
    }
    iterator.complete(p, FOREACH_ITERATOR);

    p.expect(IN_KW);
    block(p, context);
    m.complete(p, FOREACH)
}

/// `statement | '{' statement* '}'`
fn block(p: &mut Parser<'_>, context: StatementContext) {
    let m = p.start();
    if p.eat(LEFT_BRACE) {
        statements(p, context);
        p.expect(RIGHT_BRACE);
    } else if !statement(p, context) {
        m.abandon(p);
        p.error("expected a statement or `{`");
        return;
    }
    m.complete(p, BLOCK);
}

fn if_(p: &mut Parser<'_>, context: StatementContext) -> CompletedMarker {
    let m = p.start();
    p.advance();
    value(p, ValueMode::Value);
    p.expect(THEN_KW);
    block(p, context);

    // The innermost `if` takes the `else`.
    if p.at(ELSE_KW) {
        let else_branch = p.start();
        p.advance();
        block(p, context);
        else_branch.complete(p, ELSE_BRANCH);
    }
    m.complete(p, IF)
}

fn let_(p: &mut Parser<'_>, context: StatementContext) -> CompletedMarker {
    let m = p.start();
    p.advance();

    let list = p.start();
    while !p.at(IN_KW) {
        let_item(p);
        if !p.eat(COMMA) {
            break;
        }
    }
    list.complete(p, LET_LIST);

    p.expect(IN_KW);
    block(p, context);
    m.complete(p, LET)
}

fn let_item(p: &mut Parser<'_>) {
    let m = p.start();
    name(p, &NAME_RECOVERY);
    if p.eat(LEFT_ANGLE) {
        range_list(p);
        p.expect(RIGHT_ANGLE);
    }
    p.expect(EQ);
    value(p, ValueMode::Value);
    m.complete(p, LET_ITEM);
}

fn multiclass(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    name(p, &NAME_RECOVERY);
    template_args(p);
    if p.at(COLON) {
        parent_class_list(p);
    }
    multiclass_body(p);
    m.complete(p, MULTICLASS)
}

fn multiclass_body(p: &mut Parser<'_>) {
    let m = p.start();
    match p.peek_kind() {
        SEMICOLON => p.advance(),
        LEFT_BRACE => {
            p.advance();
            if p.at(RIGHT_BRACE) {
                p.error("a multiclass body needs at least one statement");
            }
            statements(p, StatementContext::Multiclass);
            p.expect(RIGHT_BRACE);
        }
        _ => {
            m.abandon(p);
            p.error("expected `;` or `{`");
            return;
        }
    }
    m.complete(p, MULTICLASS_BODY);
}

fn assert(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    value(p, ValueMode::Value);
    p.expect(COMMA);
    value(p, ValueMode::Value);
    p.expect(SEMICOLON);
    m.complete(p, ASSERT)
}

/// The path is kept as a string; resolving it is left to the caller.
fn include(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    if p.at(DOUBLE_QUOTE) {
        string(p);
    } else {
        p.error("expected a file name string");
    }
    m.complete(p, INCLUDE)
}
