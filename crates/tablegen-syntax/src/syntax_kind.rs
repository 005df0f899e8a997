/// Every token and node kind that can appear in a TableGen syntax tree.
///
/// Tokens come first, then trivia, then nodes. The order is relied upon by
/// [`SyntaxKind::is_keyword`] and by [`crate::SyntaxSet`], which packs kinds
/// into a bitset.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    LEFT_ANGLE,
    RIGHT_ANGLE,
    COMMA,
    SEMICOLON,
    COLON,
    EQ,
    HASH,
    QUESTION,
    DOT,
    ELLIPSIS,
    MINUS,
    EXCLAMATION,

    ASSERT_KW,
    BIT_KW,
    BITS_KW,
    CLASS_KW,
    CODE_KW,
    DAG_KW,
    DEF_KW,
    DEFM_KW,
    DEFSET_KW,
    DEFVAR_KW,
    ELSE_KW,
    FALSE_KW,
    FIELD_KW,
    FOREACH_KW,
    IF_KW,
    IN_KW,
    INCLUDE_KW,
    INT_KW,
    LET_KW,
    LIST_KW,
    MULTICLASS_KW,
    STRING_KW,
    THEN_KW,
    TRUE_KW,

    IDENTIFIER,
    INTEGER_LITERAL,
    DOUBLE_QUOTE,
    STRING_CONTENT,
    ESCAPE_SEQUENCE,
    CODE_BLOCK,
    VAR_NAME,
    BANG_OPERATOR,
    COND_OPERATOR,

    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    PREPROCESSOR_DIRECTIVE,

    UNKNOWN,
    EOF,

    SOURCE_FILE,

    ASSERT,
    CLASS,
    DEF,
    DEFM,
    DEFSET,
    DEFVAR,
    FOREACH,
    IF,
    INCLUDE,
    LET,
    MULTICLASS,

    PRIMITIVE_TYPE,
    BITS_TYPE,
    LIST_TYPE,
    CLASS_TYPE,

    INTEGER,
    STRING,
    CONCATENATED_STRING,
    CODE,
    BOOLEAN,
    UNINITIALIZED,
    SEQUENCE,
    LIST_INIT,
    DAG_INIT,
    IDENT,
    ANONYMOUS_RECORD,
    BANG_OPERATION,
    COND_OPERATION,
    PASTE_VALUE,
    SUFFIXED_VALUE,

    NAME,
    TEMPLATE_ARGS,
    TEMPLATE_ARG,
    RECORD_BODY,
    PARENT_CLASS_LIST,
    PARENT_CLASS,
    ARG_LIST,
    BODY,
    FIELD,
    LET_INSTRUCTION,
    BLOCK,
    ELSE_BRANCH,
    LET_LIST,
    LET_ITEM,
    FOREACH_ITERATOR,
    MULTICLASS_BODY,
    RANGE_LIST,
    RANGE_PIECE,
    BIT_SLICE,
    LIST_SLICE,
    FIELD_ACCESS,
    DAG_ARG,
    COND_CLAUSE,
    TYPE_ANNOTATION,
    ERROR,
    TOMBSTONE,
}

/// The three groups generic tools can traverse without knowing every kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Supertype {
    Statement,
    Type,
    Value,
}

impl SyntaxKind {
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE
                | Self::LINE_COMMENT
                | Self::BLOCK_COMMENT
                | Self::PREPROCESSOR_DIRECTIVE
        )
    }

    pub const fn is_keyword(self) -> bool {
        self as u16 >= Self::ASSERT_KW as u16 && self as u16 <= Self::TRUE_KW as u16
    }

    pub const fn is_token(self) -> bool {
        (self as u16) < Self::SOURCE_FILE as u16
    }

    pub const fn is_statement(self) -> bool {
        matches!(self.supertype(), Some(Supertype::Statement))
    }

    pub const fn is_type(self) -> bool {
        matches!(self.supertype(), Some(Supertype::Type))
    }

    pub const fn is_value(self) -> bool {
        matches!(self.supertype(), Some(Supertype::Value))
    }

    pub const fn supertype(self) -> Option<Supertype> {
        use SyntaxKind::*;

        match self {
            ASSERT | CLASS | DEF | DEFM | DEFSET | DEFVAR | FOREACH | IF | INCLUDE | LET
            | MULTICLASS => Some(Supertype::Statement),
            PRIMITIVE_TYPE | BITS_TYPE | LIST_TYPE | CLASS_TYPE => Some(Supertype::Type),
            INTEGER | STRING | CONCATENATED_STRING | CODE | BOOLEAN | UNINITIALIZED | SEQUENCE
            | LIST_INIT | DAG_INIT | IDENT | ANONYMOUS_RECORD | BANG_OPERATION | COND_OPERATION
            | PASTE_VALUE | SUFFIXED_VALUE => Some(Supertype::Value),
            _ => None,
        }
    }

    /// Looks up the keyword spelled `text`.
    pub fn from_keyword(text: &str) -> Option<Self> {
        use SyntaxKind::*;

        let kind = match text {
            "assert" => ASSERT_KW,
            "bit" => BIT_KW,
            "bits" => BITS_KW,
            "class" => CLASS_KW,
            "code" => CODE_KW,
            "dag" => DAG_KW,
            "def" => DEF_KW,
            "defm" => DEFM_KW,
            "defset" => DEFSET_KW,
            "defvar" => DEFVAR_KW,
            "else" => ELSE_KW,
            "false" => FALSE_KW,
            "field" => FIELD_KW,
            "foreach" => FOREACH_KW,
            "if" => IF_KW,
            "in" => IN_KW,
            "include" => INCLUDE_KW,
            "int" => INT_KW,
            "let" => LET_KW,
            "list" => LIST_KW,
            "multiclass" => MULTICLASS_KW,
            "string" => STRING_KW,
            "then" => THEN_KW,
            "true" => TRUE_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Human readable spelling used in diagnostics.
    pub const fn describe(self) -> &'static str {
        use SyntaxKind::*;

        match self {
            LEFT_PAREN => "`(`",
            RIGHT_PAREN => "`)`",
            LEFT_BRACKET => "`[`",
            RIGHT_BRACKET => "`]`",
            LEFT_BRACE => "`{`",
            RIGHT_BRACE => "`}`",
            LEFT_ANGLE => "`<`",
            RIGHT_ANGLE => "`>`",
            COMMA => "`,`",
            SEMICOLON => "`;`",
            COLON => "`:`",
            EQ => "`=`",
            HASH => "`#`",
            QUESTION => "`?`",
            DOT => "`.`",
            ELLIPSIS => "`...`",
            MINUS => "`-`",
            EXCLAMATION => "`!`",
            ASSERT_KW => "`assert`",
            BIT_KW => "`bit`",
            BITS_KW => "`bits`",
            CLASS_KW => "`class`",
            CODE_KW => "`code`",
            DAG_KW => "`dag`",
            DEF_KW => "`def`",
            DEFM_KW => "`defm`",
            DEFSET_KW => "`defset`",
            DEFVAR_KW => "`defvar`",
            ELSE_KW => "`else`",
            FALSE_KW => "`false`",
            FIELD_KW => "`field`",
            FOREACH_KW => "`foreach`",
            IF_KW => "`if`",
            IN_KW => "`in`",
            INCLUDE_KW => "`include`",
            INT_KW => "`int`",
            LET_KW => "`let`",
            LIST_KW => "`list`",
            MULTICLASS_KW => "`multiclass`",
            STRING_KW => "`string`",
            THEN_KW => "`then`",
            TRUE_KW => "`true`",
            IDENTIFIER => "identifier",
            INTEGER_LITERAL => "integer",
            DOUBLE_QUOTE => "`\"`",
            STRING_CONTENT | ESCAPE_SEQUENCE => "string",
            CODE_BLOCK => "code block",
            VAR_NAME => "variable",
            BANG_OPERATOR | COND_OPERATOR => "operator",
            EOF => "end of file",
            _ => "token",
        }
    }
}
