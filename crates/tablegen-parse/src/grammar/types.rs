use tablegen_syntax::SyntaxKind::*;
use tablegen_syntax::SyntaxSet;

use crate::parser::Parser;

pub(crate) const TYPE_FIRST: SyntaxSet =
    SyntaxSet::new([BIT_KW, BITS_KW, CODE_KW, DAG_KW, INT_KW, LIST_KW, STRING_KW, IDENTIFIER]);

/// Returns `false`, after reporting, when no type starts here.
pub(crate) fn type_(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    let kind = match p.peek_kind() {
        BIT_KW | INT_KW | STRING_KW | DAG_KW | CODE_KW => {
            p.advance();
            PRIMITIVE_TYPE
        }
        BITS_KW => {
            p.advance();
            p.expect(LEFT_ANGLE);
            if p.at(INTEGER_LITERAL) {
                let width = p.start();
                p.advance();
                width.complete(p, INTEGER);
            } else {
                p.error("expected the bit width");
            }
            p.expect(RIGHT_ANGLE);
            BITS_TYPE
        }
        LIST_KW => {
            p.advance();
            p.expect(LEFT_ANGLE);
            type_(p);
            p.expect(RIGHT_ANGLE);
            LIST_TYPE
        }
        IDENTIFIER => {
            p.advance();
            CLASS_TYPE
        }
        _ => {
            m.abandon(p);
            p.error("expected a type");
            return false;
        }
    };
    m.complete(p, kind);
    true
}

/// `'<' type '>'`, as in `[]<int>` and `!cast<string>(...)`.
pub(crate) fn type_annotation(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), LEFT_ANGLE);

    let m = p.start();
    p.advance();
    type_(p);
    p.expect(RIGHT_ANGLE);
    m.complete(p, TYPE_ANNOTATION);
}
