mod comment;
mod cursor;

pub use comment::{BlockComment, scan_block_comment};
use cursor::Cursor;
use tablegen_errors::Diagnostic;
pub use tablegen_syntax::SyntaxKind;
use tablegen_syntax::SyntaxKind::*;
use tablegen_syntax::{BangOperator, GreenTrivia, TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: GreenTrivia,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: GreenTrivia,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: GreenTrivia::empty(),
        trailing: GreenTrivia::empty(),
    };

    /// Range including leading and trailing trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.len(),
            self.kind_range.end() + self.trailing.len(),
        )
    }
}

/// Lexes the whole input eagerly. The last token is always `EOF`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let is_eof = token.kind == EOF;
        tokens.push(token);
        if is_eof {
            return tokens;
        }
    }
}

pub struct Tokenizer<'db> {
    text: &'db str,
    cursor: Cursor<'db>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
    diagnostics: Vec<Diagnostic>,
    /// Start of the open string literal, if the last token was its opening
    /// quote or a piece of its contents.
    string_start: Option<TextSize>,
}

impl<'db> Tokenizer<'db> {
    pub fn new(text: &'db str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(4),
            diagnostics: Vec::new(),
            string_start: None,
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Lexical diagnostics produced so far, in source order.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'db str {
        &self.text[self.range()]
    }

    pub fn next_token(&mut self) -> Token {
        self.trivia();
        let trailing_start = self.trivia_pieces.len();
        let (kind, kind_range) = self.syntax_kind();
        self.trivia();

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = GreenTrivia::new(leading);
        let trailing = GreenTrivia::new(trailing);

        self.trivia_pieces.clear();
        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    fn trivia(&mut self) {
        if self.string_start.is_some() {
            return;
        }

        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.block_comment();
                    TriviaPieceKind::MultiLineComment
                }
                '#' => {
                    if !self.preprocessor_directive() {
                        break;
                    }
                    TriviaPieceKind::PreprocessorDirective
                }
                first_char if first_char.is_whitespace() => {
                    self.cursor.advance_while(char::is_whitespace);
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
    }

    fn block_comment(&mut self) {
        let offset = usize::from(self.offset());
        let Some(comment) = scan_block_comment(self.text, offset) else {
            return;
        };
        self.cursor.advance_bytes(comment.end - offset);
        if !comment.terminated {
            self.diagnostics.push(Diagnostic::lexical("unterminated comment", self.range()));
        }
    }

    /// Consumes a directive if one starts at the cursor.
    fn preprocessor_directive(&mut self) -> bool {
        let rest = self.cursor.rest();
        let Some(keyword) = ["#define", "#ifdef", "#ifndef", "#else", "#endif"]
            .into_iter()
            .find(|keyword| rest.starts_with(keyword) && !continues_word(&rest[keyword.len()..]))
        else {
            return false;
        };

        self.cursor.advance_bytes(keyword.len());
        if matches!(keyword, "#else" | "#endif") {
            return true;
        }

        let after = self.cursor.rest();
        let name_start = after.len() - after.trim_start().len();
        let name = &after[name_start..];
        if name_start > 0 && name.starts_with(is_ident_start) {
            let name_len = name.find(|c: char| !is_ident_continue(c)).unwrap_or(name.len());
            self.cursor.advance_bytes(name_start + name_len);
        } else {
            self.diagnostics.push(Diagnostic::lexical(
                format!("expected a macro name after `{keyword}`"),
                self.range(),
            ));
        }
        true
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        let kind = if self.string_start.is_some() {
            self.string_piece()
        } else if self.cursor.is_eof() {
            EOF
        } else {
            self.token_kind()
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    fn token_kind(&mut self) -> SyntaxKind {
        let previous = self.cursor.previous();

        match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' if self.cursor.matches('{') => self.code_block(),
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            '<' => LEFT_ANGLE,
            '>' => RIGHT_ANGLE,
            ',' => COMMA,
            ';' => SEMICOLON,
            ':' => COLON,
            '=' => EQ,
            '#' => HASH,
            '?' => QUESTION,
            '.' if self.cursor.rest().starts_with("..") => {
                self.cursor.advance_bytes(2);
                ELLIPSIS
            }
            '.' => DOT,
            '"' => {
                self.string_start = Some(self.range().start());
                DOUBLE_QUOTE
            }
            '!' => self.bang(),
            '$' if self.cursor.peek().is_ascii_alphabetic() || self.cursor.matches('_') => {
                self.cursor.advance_while(is_ident_continue);
                VAR_NAME
            }
            '-' | '+' if self.cursor.peek().is_ascii_digit() && !ends_operand(previous) => {
                self.cursor.advance_while(|c| c.is_ascii_digit());
                INTEGER_LITERAL
            }
            '-' => MINUS,
            '0'..='9' => self.number_or_identifier(),
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(is_ident_continue);
                SyntaxKind::from_keyword(self.text()).unwrap_or(IDENTIFIER)
            }
            first_char => {
                self.diagnostics.push(Diagnostic::lexical(
                    format!("unrecognized character {first_char:?}"),
                    self.range(),
                ));
                UNKNOWN
            }
        }
    }

    /// `[{ ... }]`. The first `}]` ends the block, even inside nested code.
    fn code_block(&mut self) -> SyntaxKind {
        self.cursor.advance();
        match self.cursor.rest().find("}]") {
            Some(close) => self.cursor.advance_bytes(close + 2),
            None => {
                self.cursor.advance_bytes(self.cursor.rest().len());
                self.diagnostics.push(Diagnostic::lexical("unterminated code block", self.range()));
            }
        }
        CODE_BLOCK
    }

    fn bang(&mut self) -> SyntaxKind {
        let rest = self.cursor.rest();
        let len = rest.find(|c: char| !is_ident_continue(c)).unwrap_or(rest.len());
        let name = &rest[..len];

        let kind = if name == "cond" {
            COND_OPERATOR
        } else if BangOperator::from_name(name).is_some() {
            BANG_OPERATOR
        } else {
            return EXCLAMATION;
        };
        self.cursor.advance_bytes(len);
        kind
    }

    /// Integers and identifiers may both start with digits; the longer match
    /// wins and a tie goes to the integer.
    fn number_or_identifier(&mut self) -> SyntaxKind {
        let rest = &self.text[usize::from(self.range().start())..];
        let integer = integer_len(rest);
        let identifier = identifier_len(rest);

        let (kind, len) = if identifier > integer {
            (IDENTIFIER, identifier)
        } else {
            (INTEGER_LITERAL, integer)
        };
        self.cursor.advance_bytes(len - 1);
        kind
    }

    fn string_piece(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            if let Some(start) = self.string_start.take() {
                self.diagnostics.push(Diagnostic::lexical(
                    "unterminated string",
                    TextRange::new(start, self.offset()),
                ));
            }
            return EOF;
        }

        match self.cursor.advance() {
            '"' => {
                self.string_start = None;
                DOUBLE_QUOTE
            }
            '\\' => self.escape_sequence(),
            _ => {
                self.cursor.advance_while(|c| c != '"' && c != '\\');
                STRING_CONTENT
            }
        }
    }

    fn escape_sequence(&mut self) -> SyntaxKind {
        let valid = match self.cursor.peek() {
            _ if self.cursor.is_eof() => false,
            '0'..='7' => {
                for _ in 0..3 {
                    if !matches!(self.cursor.peek(), '0'..='7') {
                        break;
                    }
                    self.cursor.advance();
                }
                true
            }
            'x' => {
                self.cursor.advance();
                self.hex_digits(2) == 2
            }
            'u' if self.cursor.second() == '{' => {
                self.cursor.advance();
                self.cursor.advance();
                let digits = self.hex_digits(usize::MAX);
                let closed = self.cursor.matches('}');
                if closed {
                    self.cursor.advance();
                }
                digits > 0 && closed
            }
            'u' => {
                self.cursor.advance();
                self.hex_digits(4) == 4
            }
            'U' => {
                self.cursor.advance();
                let rest = self.cursor.rest();
                if rest.len() >= 8 && rest.as_bytes()[..8].iter().all(u8::is_ascii_hexdigit) {
                    self.cursor.advance_bytes(8);
                }
                true
            }
            _ => {
                self.cursor.advance();
                true
            }
        };

        if !valid {
            self.diagnostics.push(Diagnostic::lexical("invalid escape sequence", self.range()));
        }
        ESCAPE_SEQUENCE
    }

    fn hex_digits(&mut self, max: usize) -> usize {
        let mut count = 0;
        while count < max && self.cursor.peek().is_ascii_hexdigit() {
            self.cursor.advance();
            count += 1;
        }
        count
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn continues_word(rest: &str) -> bool {
    rest.starts_with(is_ident_continue)
}

/// Characters after which a `+`/`-` cannot be a sign.
fn ends_operand(previous: char) -> bool {
    is_ident_continue(previous) || matches!(previous, ')' | ']' | '}' | '>' | '"')
}

fn integer_len(text: &str) -> usize {
    let prefixed = |prefix: &str, digit: fn(&u8) -> bool| {
        let digits = text.strip_prefix(prefix)?;
        let len = digits.bytes().take_while(digit).count();
        (len > 0).then_some(prefix.len() + len)
    };
    let decimal = text.bytes().take_while(u8::is_ascii_digit).count();

    prefixed("0x", u8::is_ascii_hexdigit)
        .or_else(|| prefixed("0b", |b: &u8| matches!(*b, b'0' | b'1')))
        .map_or(decimal, |len| len.max(decimal))
}

/// Length of `[0-9]*[a-zA-Z_][a-zA-Z0-9_]*` at the start of `text`, or 0.
fn identifier_len(text: &str) -> usize {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let rest = &text[digits..];
    if !rest.starts_with(is_ident_start) {
        return 0;
    }
    digits + rest.find(|c: char| !is_ident_continue(c)).unwrap_or(rest.len())
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;

    fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
        &text[token.kind_range]
    }

    fn kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        tokenize(text)
            .iter()
            .filter(|token| token.kind != EOF)
            .map(|token| (token.kind, token_text(token, text)))
            .collect()
    }

    fn check(text: &str, expect: Expect) {
        let mut tokenizer = Tokenizer::new(text);
        let mut actual = String::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind == EOF {
                break;
            }
            actual.push_str(&format!("{:?} {:?}\n", token.kind, token_text(&token, text)));
        }
        for diagnostic in tokenizer.take_diagnostics() {
            actual.push_str(&format!("error {:?}: {}\n", diagnostic.range(), diagnostic.message()));
        }
        expect.assert_eq(&actual);
    }

    #[test]
    fn integer_literals() {
        for input in ["123", "0", "0b1010", "0x1f", "0x1F", "-5", "+7"] {
            let tokens = tokenize(input);
            assert_eq!(tokens[0].kind, INTEGER_LITERAL, "input: {input:?}");
            assert_eq!(token_text(&tokens[0], input), input);
            assert_eq!(tokens[1].kind, EOF);
        }
    }

    #[test]
    fn digit_initial_identifiers() {
        for input in ["1abc", "0xZZ", "0b12", "8x", "32_bit"] {
            let tokens = tokenize(input);
            assert_eq!(tokens[0].kind, IDENTIFIER, "input: {input:?}");
            assert_eq!(token_text(&tokens[0], input), input);
        }
    }

    #[test]
    fn keywords_are_never_identifiers() {
        assert_eq!(kinds("class classy"), [(CLASS_KW, "class"), (IDENTIFIER, "classy")]);
        assert_eq!(kinds("true false"), [(TRUE_KW, "true"), (FALSE_KW, "false")]);
    }

    #[test]
    fn minus_versus_signed_integer() {
        assert_eq!(kinds("0-3"), [(INTEGER_LITERAL, "0"), (MINUS, "-"), (INTEGER_LITERAL, "3")]);
        assert_eq!(kinds("0 -3"), [(INTEGER_LITERAL, "0"), (INTEGER_LITERAL, "-3")]);
        assert_eq!(kinds("a-3"), [(IDENTIFIER, "a"), (MINUS, "-"), (INTEGER_LITERAL, "3")]);
        assert_eq!(kinds("(-3)"), [(LEFT_PAREN, "("), (INTEGER_LITERAL, "-3"), (RIGHT_PAREN, ")")]);
        assert_eq!(kinds("x - y"), [(IDENTIFIER, "x"), (MINUS, "-"), (IDENTIFIER, "y")]);
    }

    #[test]
    fn ellipsis_before_dot() {
        assert_eq!(
            kinds("0...3 a.b"),
            [
                (INTEGER_LITERAL, "0"),
                (ELLIPSIS, "..."),
                (INTEGER_LITERAL, "3"),
                (IDENTIFIER, "a"),
                (DOT, "."),
                (IDENTIFIER, "b"),
            ]
        );
    }

    #[test]
    fn bang_operators() {
        assert_eq!(kinds("!add"), [(BANG_OPERATOR, "!add")]);
        assert_eq!(kinds("!foreach"), [(BANG_OPERATOR, "!foreach")]);
        assert_eq!(kinds("!cond"), [(COND_OPERATOR, "!cond")]);
        assert_eq!(kinds("!frobnicate"), [(EXCLAMATION, "!"), (IDENTIFIER, "frobnicate")]);
    }

    #[test]
    fn variables() {
        assert_eq!(kinds("$dst"), [(VAR_NAME, "$dst")]);
    }

    #[test]
    fn strings() {
        check(
            r#""a\n\x41" "b""#,
            expect![[r#"
                DOUBLE_QUOTE "\""
                STRING_CONTENT "a"
                ESCAPE_SEQUENCE "\\n"
                ESCAPE_SEQUENCE "\\x41"
                DOUBLE_QUOTE "\""
                DOUBLE_QUOTE "\""
                STRING_CONTENT "b"
                DOUBLE_QUOTE "\""
            "#]],
        );
    }

    #[test]
    fn strings_keep_their_whitespace() {
        let text = r#"" a // b ""#;
        assert_eq!(
            kinds(text),
            [(DOUBLE_QUOTE, "\""), (STRING_CONTENT, " a // b "), (DOUBLE_QUOTE, "\"")]
        );
    }

    #[test]
    fn invalid_escape() {
        check(
            r#""\xZ""#,
            expect![[r#"
                DOUBLE_QUOTE "\""
                ESCAPE_SEQUENCE "\\x"
                STRING_CONTENT "Z"
                DOUBLE_QUOTE "\""
                error 1..3: invalid escape sequence
            "#]],
        );
    }

    #[test]
    fn unterminated_string() {
        check(
            "\"abc\n",
            expect![[r#"
                DOUBLE_QUOTE "\""
                STRING_CONTENT "abc\n"
                error 0..5: unterminated string
            "#]],
        );
    }

    #[test]
    fn code_blocks() {
        assert_eq!(kinds("[{ x = y; }]"), [(CODE_BLOCK, "[{ x = y; }]")]);
    }

    #[test]
    fn code_block_ends_at_first_terminator() {
        check(
            "[{ a[{b}] }]",
            expect![[r#"
                CODE_BLOCK "[{ a[{b}]"
                RIGHT_BRACE "}"
                RIGHT_BRACKET "]"
            "#]],
        );
    }

    #[test]
    fn unterminated_code_block() {
        check(
            "[{ abc",
            expect![[r#"
                CODE_BLOCK "[{ abc"
                error 0..6: unterminated code block
            "#]],
        );
    }

    #[test]
    fn comments_are_trivia() {
        let text = "a // line\n/* block */ b";
        let tokens = tokenize(text);
        assert_eq!(tokens[0].kind, IDENTIFIER);
        let kinds: Vec<_> = tokens[0].trailing.pieces().iter().map(|piece| piece.kind).collect();
        assert_eq!(
            kinds,
            [
                TriviaPieceKind::Whitespace,
                TriviaPieceKind::SingleLineComment,
                TriviaPieceKind::Whitespace,
                TriviaPieceKind::MultiLineComment,
                TriviaPieceKind::Whitespace,
            ]
        );
        assert_eq!(tokens[1].kind, IDENTIFIER);
        assert_eq!(token_text(&tokens[1], text), "b");
    }

    #[test]
    fn unterminated_comment() {
        check(
            "a /* b",
            expect![[r#"
                IDENTIFIER "a"
                error 2..6: unterminated comment
            "#]],
        );
    }

    #[test]
    fn preprocessor_directives() {
        let text = "#ifdef FOO\ndef X;\n#else\n#endif\n";
        let tokens = tokenize(text);
        assert_eq!(tokens[0].leading.pieces()[0].kind, TriviaPieceKind::PreprocessorDirective);
        assert_eq!(tokens[0].leading.pieces()[0].len, TextSize::new(10));
        assert_eq!(tokens[0].kind, DEF_KW);

        let trailing: Vec<_> = tokens[2].trailing.pieces().iter().map(|piece| piece.kind).collect();
        assert_eq!(
            trailing,
            [
                TriviaPieceKind::Whitespace,
                TriviaPieceKind::PreprocessorDirective,
                TriviaPieceKind::Whitespace,
                TriviaPieceKind::PreprocessorDirective,
                TriviaPieceKind::Whitespace,
            ]
        );
    }

    #[test]
    fn directive_keyword_needs_word_boundary() {
        assert_eq!(kinds("#elsewhere"), [(HASH, "#"), (IDENTIFIER, "elsewhere")]);
    }

    #[test]
    fn directive_without_macro_name() {
        check(
            "#define\n",
            expect![[r#"
                error 0..7: expected a macro name after `#define`
            "#]],
        );
    }

    #[test]
    fn unknown_characters() {
        check(
            "a @ b",
            expect![[r#"
                IDENTIFIER "a"
                UNKNOWN "@"
                IDENTIFIER "b"
                error 2..3: unrecognized character '@'
            "#]],
        );
    }

    #[test]
    fn nul_is_not_end_of_input() {
        assert_eq!(kinds("a\0b"), [(IDENTIFIER, "a"), (UNKNOWN, "\0"), (IDENTIFIER, "b")]);
    }

    #[test]
    fn tokens_cover_input() {
        let text = "  class Foo<int n> { string s = \"x\\ty\"; } // end\n";
        let covered: String =
            tokenize(text).iter().map(|token| &text[token.full_range()]).collect();
        assert_eq!(covered, text);
    }
}
