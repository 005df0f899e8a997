//! Typed views over the raw syntax tree.
//!
//! Every wrapper is a `Copy` handle around a [`SyntaxNode`] of one kind.
//! Accessors return `Option` because the parser keeps going on malformed
//! input and any child may be missing.

use crate::SyntaxKind::{self, *};
use crate::{BangOperator, SyntaxElement, SyntaxNode, SyntaxToken, TriviaPieceKind};

pub trait Node<'a>: Copy {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_nodes {
    ($($(#[$meta:meta])* $name:ident => $kind:ident,)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> Node<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_nodes! {
    SourceFile => SOURCE_FILE,

    Assert => ASSERT,
    Class => CLASS,
    Def => DEF,
    Defm => DEFM,
    Defset => DEFSET,
    Defvar => DEFVAR,
    Foreach => FOREACH,
    If => IF,
    Include => INCLUDE,
    Let => LET,
    Multiclass => MULTICLASS,

    PrimitiveType => PRIMITIVE_TYPE,
    BitsType => BITS_TYPE,
    ListType => LIST_TYPE,
    ClassType => CLASS_TYPE,

    IntegerLit => INTEGER,
    StringLit => STRING,
    ConcatenatedString => CONCATENATED_STRING,
    CodeLit => CODE,
    BooleanLit => BOOLEAN,
    Uninitialized => UNINITIALIZED,
    Sequence => SEQUENCE,
    ListInit => LIST_INIT,
    DagInit => DAG_INIT,
    /// A bare identifier used as a value.
    Ident => IDENT,
    AnonymousRecord => ANONYMOUS_RECORD,
    BangOperation => BANG_OPERATION,
    CondOperation => COND_OPERATION,
    PasteValue => PASTE_VALUE,
    SuffixedValue => SUFFIXED_VALUE,

    /// The declared name of a class, multiclass, field or variable.
    Name => NAME,
    TemplateArgs => TEMPLATE_ARGS,
    TemplateArg => TEMPLATE_ARG,
    RecordBody => RECORD_BODY,
    ParentClassList => PARENT_CLASS_LIST,
    ParentClass => PARENT_CLASS,
    ArgList => ARG_LIST,
    Body => BODY,
    Field => FIELD,
    LetInstruction => LET_INSTRUCTION,
    Block => BLOCK,
    LetItem => LET_ITEM,
    ForeachIterator => FOREACH_ITERATOR,
    MulticlassBody => MULTICLASS_BODY,
    RangeList => RANGE_LIST,
    RangePiece => RANGE_PIECE,
    BitSlice => BIT_SLICE,
    ListSlice => LIST_SLICE,
    FieldAccess => FIELD_ACCESS,
    DagArg => DAG_ARG,
    CondClause => COND_CLAUSE,
    TypeAnnotation => TYPE_ANNOTATION,
}

fn child<'a, N: Node<'a>>(node: SyntaxNode<'a>) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<'a, N: Node<'a> + 'a>(node: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    node.children().filter_map(N::cast)
}

fn token<'a>(node: SyntaxNode<'a>, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
    node.token_by_kind(kind)
}

/// First child castable to `N` that comes after the first `kind` token.
fn child_after<'a, N: Node<'a>>(node: SyntaxNode<'a>, kind: SyntaxKind) -> Option<N> {
    node.children_with_tokens()
        .skip_while(|element| element.kind() != kind)
        .filter_map(SyntaxElement::into_node)
        .find_map(N::cast)
}

/// Children castable to `N` that come before the first `kind` token.
fn children_before<'a, N: Node<'a> + 'a>(
    node: SyntaxNode<'a>,
    kind: SyntaxKind,
) -> impl Iterator<Item = N> + 'a {
    node.children_with_tokens()
        .take_while(move |element| element.kind() != kind)
        .filter_map(SyntaxElement::into_node)
        .filter_map(N::cast)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    Assert(Assert<'a>),
    Class(Class<'a>),
    Def(Def<'a>),
    Defm(Defm<'a>),
    Defset(Defset<'a>),
    Defvar(Defvar<'a>),
    Foreach(Foreach<'a>),
    If(If<'a>),
    Include(Include<'a>),
    Let(Let<'a>),
    Multiclass(Multiclass<'a>),
}

impl<'a> Node<'a> for Statement<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Some(match syntax.kind() {
            ASSERT => Statement::Assert(Assert(syntax)),
            CLASS => Statement::Class(Class(syntax)),
            DEF => Statement::Def(Def(syntax)),
            DEFM => Statement::Defm(Defm(syntax)),
            DEFSET => Statement::Defset(Defset(syntax)),
            DEFVAR => Statement::Defvar(Defvar(syntax)),
            FOREACH => Statement::Foreach(Foreach(syntax)),
            IF => Statement::If(If(syntax)),
            INCLUDE => Statement::Include(Include(syntax)),
            LET => Statement::Let(Let(syntax)),
            MULTICLASS => Statement::Multiclass(Multiclass(syntax)),
            _ => return None,
        })
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Statement::Assert(it) => it.0,
            Statement::Class(it) => it.0,
            Statement::Def(it) => it.0,
            Statement::Defm(it) => it.0,
            Statement::Defset(it) => it.0,
            Statement::Defvar(it) => it.0,
            Statement::Foreach(it) => it.0,
            Statement::If(it) => it.0,
            Statement::Include(it) => it.0,
            Statement::Let(it) => it.0,
            Statement::Multiclass(it) => it.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type<'a> {
    Primitive(PrimitiveType<'a>),
    Bits(BitsType<'a>),
    List(ListType<'a>),
    Class(ClassType<'a>),
}

impl<'a> Node<'a> for Type<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Some(match syntax.kind() {
            PRIMITIVE_TYPE => Type::Primitive(PrimitiveType(syntax)),
            BITS_TYPE => Type::Bits(BitsType(syntax)),
            LIST_TYPE => Type::List(ListType(syntax)),
            CLASS_TYPE => Type::Class(ClassType(syntax)),
            _ => return None,
        })
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Type::Primitive(it) => it.0,
            Type::Bits(it) => it.0,
            Type::List(it) => it.0,
            Type::Class(it) => it.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Integer(IntegerLit<'a>),
    String(StringLit<'a>),
    ConcatenatedString(ConcatenatedString<'a>),
    Code(CodeLit<'a>),
    Boolean(BooleanLit<'a>),
    Uninitialized(Uninitialized<'a>),
    Sequence(Sequence<'a>),
    ListInit(ListInit<'a>),
    DagInit(DagInit<'a>),
    Ident(Ident<'a>),
    AnonymousRecord(AnonymousRecord<'a>),
    Bang(BangOperation<'a>),
    Cond(CondOperation<'a>),
    Paste(PasteValue<'a>),
    Suffixed(SuffixedValue<'a>),
}

impl<'a> Node<'a> for Value<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Some(match syntax.kind() {
            INTEGER => Value::Integer(IntegerLit(syntax)),
            STRING => Value::String(StringLit(syntax)),
            CONCATENATED_STRING => Value::ConcatenatedString(ConcatenatedString(syntax)),
            CODE => Value::Code(CodeLit(syntax)),
            BOOLEAN => Value::Boolean(BooleanLit(syntax)),
            UNINITIALIZED => Value::Uninitialized(Uninitialized(syntax)),
            SEQUENCE => Value::Sequence(Sequence(syntax)),
            LIST_INIT => Value::ListInit(ListInit(syntax)),
            DAG_INIT => Value::DagInit(DagInit(syntax)),
            IDENT => Value::Ident(Ident(syntax)),
            ANONYMOUS_RECORD => Value::AnonymousRecord(AnonymousRecord(syntax)),
            BANG_OPERATION => Value::Bang(BangOperation(syntax)),
            COND_OPERATION => Value::Cond(CondOperation(syntax)),
            PASTE_VALUE => Value::Paste(PasteValue(syntax)),
            SUFFIXED_VALUE => Value::Suffixed(SuffixedValue(syntax)),
            _ => return None,
        })
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Value::Integer(it) => it.0,
            Value::String(it) => it.0,
            Value::ConcatenatedString(it) => it.0,
            Value::Code(it) => it.0,
            Value::Boolean(it) => it.0,
            Value::Uninitialized(it) => it.0,
            Value::Sequence(it) => it.0,
            Value::ListInit(it) => it.0,
            Value::DagInit(it) => it.0,
            Value::Ident(it) => it.0,
            Value::AnonymousRecord(it) => it.0,
            Value::Bang(it) => it.0,
            Value::Cond(it) => it.0,
            Value::Paste(it) => it.0,
            Value::Suffixed(it) => it.0,
        }
    }
}

impl<'a> SourceFile<'a> {
    pub fn statements(self) -> impl Iterator<Item = Statement<'a>> + 'a {
        children(self.0)
    }

    /// Preprocessor directives, which the grammar carries as trivia.
    pub fn preprocessor_directives(self) -> impl Iterator<Item = &'a str> + 'a {
        self.0.tokens().flat_map(|token| {
            token
                .leading_trivia()
                .chain(token.trailing_trivia())
                .filter(|trivia| trivia.kind == TriviaPieceKind::PreprocessorDirective)
                .map(|trivia| trivia.text)
        })
    }
}

impl<'a> Name<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENTIFIER)
    }

    pub fn text(self) -> &'a str {
        self.0.text_trimmed()
    }
}

impl<'a> Class<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn template_args(self) -> Option<TemplateArgs<'a>> {
        child(self.0)
    }

    pub fn record_body(self) -> Option<RecordBody<'a>> {
        child(self.0)
    }
}

impl<'a> TemplateArgs<'a> {
    pub fn args(self) -> impl Iterator<Item = TemplateArg<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> TemplateArg<'a> {
    pub fn ty(self) -> Option<Type<'a>> {
        child(self.0)
    }

    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn default_value(self) -> Option<Value<'a>> {
        child_after(self.0, EQ)
    }
}

impl<'a> RecordBody<'a> {
    pub fn parent_class_list(self) -> Option<ParentClassList<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Body<'a>> {
        child(self.0)
    }
}

impl<'a> ParentClassList<'a> {
    pub fn classes(self) -> impl Iterator<Item = ParentClass<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> ParentClass<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENTIFIER)
    }

    pub fn args(self) -> Option<ArgList<'a>> {
        child(self.0)
    }
}

impl<'a> ArgList<'a> {
    pub fn values(self) -> impl Iterator<Item = Value<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> Body<'a> {
    /// `true` for the `;` form.
    pub fn is_empty_form(self) -> bool {
        token(self.0, SEMICOLON).is_some() && token(self.0, LEFT_BRACE).is_none()
    }

    pub fn items(self) -> impl Iterator<Item = BodyItem<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyItem<'a> {
    Field(Field<'a>),
    Let(LetInstruction<'a>),
    Defvar(Defvar<'a>),
    Assert(Assert<'a>),
}

impl<'a> Node<'a> for BodyItem<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Some(match syntax.kind() {
            FIELD => BodyItem::Field(Field(syntax)),
            LET_INSTRUCTION => BodyItem::Let(LetInstruction(syntax)),
            DEFVAR => BodyItem::Defvar(Defvar(syntax)),
            ASSERT => BodyItem::Assert(Assert(syntax)),
            _ => return None,
        })
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            BodyItem::Field(it) => it.0,
            BodyItem::Let(it) => it.0,
            BodyItem::Defvar(it) => it.0,
            BodyItem::Assert(it) => it.0,
        }
    }
}

impl<'a> Field<'a> {
    /// Whether the deprecated `field` keyword was written.
    pub fn has_field_keyword(self) -> bool {
        token(self.0, FIELD_KW).is_some()
    }

    pub fn ty(self) -> Option<Type<'a>> {
        child(self.0)
    }

    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn value(self) -> Option<Value<'a>> {
        child_after(self.0, EQ)
    }
}

impl<'a> LetInstruction<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn bits(self) -> Option<RangeList<'a>> {
        child(self.0)
    }

    pub fn value(self) -> Option<Value<'a>> {
        child_after(self.0, EQ)
    }
}

impl<'a> Def<'a> {
    /// The name expression; `None` for anonymous records.
    pub fn name(self) -> Option<Value<'a>> {
        child(self.0)
    }

    pub fn record_body(self) -> Option<RecordBody<'a>> {
        child(self.0)
    }
}

impl<'a> Defm<'a> {
    pub fn name(self) -> Option<Value<'a>> {
        child(self.0)
    }

    pub fn parent_class_list(self) -> Option<ParentClassList<'a>> {
        child(self.0)
    }
}

impl<'a> Defset<'a> {
    pub fn ty(self) -> Option<Type<'a>> {
        child(self.0)
    }

    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn statements(self) -> impl Iterator<Item = Statement<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> Defvar<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn value(self) -> Option<Value<'a>> {
        child_after(self.0, EQ)
    }
}

impl<'a> Foreach<'a> {
    pub fn iterator(self) -> Option<ForeachIterator<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeachRange<'a> {
    /// `{ range_list }`
    List(RangeList<'a>),
    /// A single range piece or plain value.
    Piece(RangePiece<'a>),
}

impl<'a> ForeachIterator<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn range(self) -> Option<ForeachRange<'a>> {
        self.0.children().find_map(|node| match node.kind() {
            RANGE_LIST => Some(ForeachRange::List(RangeList(node))),
            RANGE_PIECE => Some(ForeachRange::Piece(RangePiece(node))),
            _ => None,
        })
    }
}

impl<'a> Block<'a> {
    /// `true` when the block is braced rather than a single statement.
    pub fn is_braced(self) -> bool {
        token(self.0, LEFT_BRACE).is_some()
    }

    pub fn statements(self) -> impl Iterator<Item = Statement<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> If<'a> {
    pub fn condition(self) -> Option<Value<'a>> {
        child(self.0)
    }

    pub fn then_branch(self) -> Option<Block<'a>> {
        child(self.0)
    }

    pub fn else_branch(self) -> Option<Block<'a>> {
        self.0.child_by_kind(ELSE_BRANCH).and_then(child)
    }
}

impl<'a> Let<'a> {
    pub fn items(self) -> impl Iterator<Item = LetItem<'a>> + 'a {
        self.0.child_by_kind(LET_LIST).into_iter().flat_map(children::<LetItem<'a>>)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> LetItem<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn bits(self) -> Option<RangeList<'a>> {
        child(self.0)
    }

    pub fn value(self) -> Option<Value<'a>> {
        child_after(self.0, EQ)
    }
}

impl<'a> Multiclass<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        child(self.0)
    }

    pub fn template_args(self) -> Option<TemplateArgs<'a>> {
        child(self.0)
    }

    pub fn parent_class_list(self) -> Option<ParentClassList<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<MulticlassBody<'a>> {
        child(self.0)
    }
}

impl<'a> MulticlassBody<'a> {
    pub fn statements(self) -> impl Iterator<Item = Statement<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> Assert<'a> {
    pub fn condition(self) -> Option<Value<'a>> {
        children_before(self.0, COMMA).next()
    }

    pub fn message(self) -> Option<Value<'a>> {
        child_after(self.0, COMMA)
    }
}

impl<'a> Include<'a> {
    pub fn path(self) -> Option<StringLit<'a>> {
        child(self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrimitiveKind {
    Bit,
    Int,
    String,
    Dag,
    Code,
}

impl PrimitiveType<'_> {
    pub fn kind(self) -> Option<PrimitiveKind> {
        self.0.children_with_tokens().filter_map(SyntaxElement::into_token).find_map(|token| {
            Some(match token.kind() {
                BIT_KW => PrimitiveKind::Bit,
                INT_KW => PrimitiveKind::Int,
                STRING_KW => PrimitiveKind::String,
                DAG_KW => PrimitiveKind::Dag,
                CODE_KW => PrimitiveKind::Code,
                _ => return None,
            })
        })
    }
}

impl<'a> BitsType<'a> {
    pub fn width(self) -> Option<IntegerLit<'a>> {
        child(self.0)
    }
}

impl<'a> ListType<'a> {
    pub fn element(self) -> Option<Type<'a>> {
        child(self.0)
    }
}

impl<'a> ClassType<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENTIFIER)
    }
}

impl<'a> IntegerLit<'a> {
    pub fn text(self) -> &'a str {
        self.0.text_trimmed()
    }

    /// The literal's value. Hex and binary literals are 64-bit patterns.
    pub fn value(self) -> Option<i64> {
        parse_integer(self.0.text_trimmed())
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()? as i64
    } else if let Some(bin) = digits.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()? as i64
    } else {
        return text.parse().ok();
    };
    Some(if negative { magnitude.wrapping_neg() } else { magnitude })
}

impl StringLit<'_> {
    /// The string with escape sequences decoded.
    pub fn value(self) -> String {
        let mut value = String::new();
        for token in self.0.children_with_tokens().filter_map(SyntaxElement::into_token) {
            match token.kind() {
                STRING_CONTENT => value.push_str(token.text_trimmed()),
                ESCAPE_SEQUENCE => unescape(token.text_trimmed(), &mut value),
                _ => {}
            }
        }
        value
    }
}

fn unescape(escape: &str, out: &mut String) {
    let body = &escape[1..];
    let decoded = match body.as_bytes().first() {
        Some(b'n') => Some('\n'),
        Some(b't') => Some('\t'),
        Some(b'r') => Some('\r'),
        Some(b'a') => Some('\u{7}'),
        Some(b'b') => Some('\u{8}'),
        Some(b'f') => Some('\u{c}'),
        Some(b'v') => Some('\u{b}'),
        Some(b'0'..=b'7') => u32::from_str_radix(body, 8).ok().and_then(char::from_u32),
        Some(b'x') | Some(b'U') if body.len() > 1 => {
            u32::from_str_radix(&body[1..], 16).ok().and_then(char::from_u32)
        }
        Some(b'u') => {
            let digits = body[1..].trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
        }
        _ => body.chars().next(),
    };
    match decoded {
        Some(ch) => out.push(ch),
        None => out.push_str(escape),
    }
}

impl<'a> ConcatenatedString<'a> {
    pub fn parts(self) -> impl Iterator<Item = StringLit<'a>> + 'a {
        children(self.0)
    }

    pub fn value(self) -> String {
        self.parts().map(StringLit::value).collect()
    }
}

impl<'a> CodeLit<'a> {
    /// The text between `[{` and `}]`.
    pub fn code(self) -> &'a str {
        let text = self.0.text_trimmed();
        let text = text.strip_prefix("[{").unwrap_or(text);
        text.strip_suffix("}]").unwrap_or(text)
    }
}

impl BooleanLit<'_> {
    pub fn value(self) -> bool {
        token(self.0, TRUE_KW).is_some()
    }
}

impl<'a> Sequence<'a> {
    pub fn values(self) -> impl Iterator<Item = Value<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> ListInit<'a> {
    pub fn values(self) -> impl Iterator<Item = Value<'a>> + 'a {
        children(self.0)
    }

    pub fn element_type(self) -> Option<Type<'a>> {
        self.0.child_by_kind(TYPE_ANNOTATION).and_then(child)
    }
}

impl<'a> DagInit<'a> {
    /// The operator is the first dag argument.
    pub fn operator(self) -> Option<DagArg<'a>> {
        children(self.0).next()
    }

    pub fn args(self) -> impl Iterator<Item = DagArg<'a>> + 'a {
        children(self.0).skip(1)
    }
}

impl<'a> DagArg<'a> {
    pub fn value(self) -> Option<Value<'a>> {
        child(self.0)
    }

    /// The `$name` binding, if any.
    pub fn var_name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, VAR_NAME)
    }
}

impl<'a> Ident<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENTIFIER)
    }

    pub fn text(self) -> &'a str {
        self.0.text_trimmed()
    }
}

impl<'a> AnonymousRecord<'a> {
    pub fn class_name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENTIFIER)
    }

    pub fn args(self) -> Option<ArgList<'a>> {
        child(self.0)
    }
}

impl<'a> BangOperation<'a> {
    pub fn operator_token(self) -> Option<SyntaxToken<'a>> {
        token(self.0, BANG_OPERATOR)
    }

    pub fn operator(self) -> Option<BangOperator> {
        let text = self.operator_token()?.text_trimmed();
        BangOperator::from_name(text.strip_prefix('!')?)
    }

    /// Explicit result type, as in `!cast<string>(...)`.
    pub fn result_type(self) -> Option<Type<'a>> {
        self.0.child_by_kind(TYPE_ANNOTATION).and_then(child)
    }

    pub fn args(self) -> impl Iterator<Item = Value<'a>> + 'a {
        self.0.child_by_kind(ARG_LIST).into_iter().flat_map(children::<Value<'a>>)
    }
}

impl<'a> CondOperation<'a> {
    pub fn clauses(self) -> impl Iterator<Item = CondClause<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> CondClause<'a> {
    pub fn condition(self) -> Option<Value<'a>> {
        children_before(self.0, COLON).next()
    }

    pub fn value(self) -> Option<Value<'a>> {
        child_after(self.0, COLON)
    }
}

impl<'a> PasteValue<'a> {
    pub fn lhs(self) -> Option<Value<'a>> {
        children_before(self.0, HASH).next()
    }

    /// `None` for a trailing paste such as `Foo#`.
    pub fn rhs(self) -> Option<Value<'a>> {
        child_after(self.0, HASH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix<'a> {
    /// `value{range}`
    BitSlice(BitSlice<'a>),
    /// `value[range]`
    ListSlice(ListSlice<'a>),
    /// `value.name`
    FieldAccess(FieldAccess<'a>),
}

impl<'a> SuffixedValue<'a> {
    pub fn value(self) -> Option<Value<'a>> {
        child(self.0)
    }

    pub fn suffix(self) -> Option<Suffix<'a>> {
        self.0.children().find_map(|node| match node.kind() {
            BIT_SLICE => Some(Suffix::BitSlice(BitSlice(node))),
            LIST_SLICE => Some(Suffix::ListSlice(ListSlice(node))),
            FIELD_ACCESS => Some(Suffix::FieldAccess(FieldAccess(node))),
            _ => None,
        })
    }
}

impl<'a> BitSlice<'a> {
    pub fn ranges(self) -> Option<RangeList<'a>> {
        child(self.0)
    }
}

impl<'a> ListSlice<'a> {
    pub fn ranges(self) -> Option<RangeList<'a>> {
        child(self.0)
    }
}

impl<'a> FieldAccess<'a> {
    pub fn field(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENTIFIER)
    }
}

impl<'a> TypeAnnotation<'a> {
    pub fn ty(self) -> Option<Type<'a>> {
        child(self.0)
    }
}

impl<'a> RangeList<'a> {
    pub fn pieces(self) -> impl Iterator<Item = RangePiece<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangeSeparator {
    /// `a...b`
    Ellipsis,
    /// `a-b`
    Dash,
    /// `a -b`: the end was lexed as a negative integer.
    GluedDash,
}

impl<'a> RangePiece<'a> {
    pub fn start(self) -> Option<Value<'a>> {
        children(self.0).next()
    }

    pub fn end(self) -> Option<Value<'a>> {
        children(self.0).nth(1)
    }

    pub fn separator(self) -> Option<RangeSeparator> {
        if token(self.0, ELLIPSIS).is_some() {
            Some(RangeSeparator::Ellipsis)
        } else if token(self.0, MINUS).is_some() {
            Some(RangeSeparator::Dash)
        } else if self.end().is_some() {
            Some(RangeSeparator::GluedDash)
        } else {
            None
        }
    }

    /// Inclusive integer bounds when both ends are integer literals. A
    /// single integer is the range `(n, n)`.
    pub fn integer_bounds(self) -> Option<(i64, i64)> {
        let int = |value: Option<Value<'a>>| match value? {
            Value::Integer(int) => int.value(),
            _ => None,
        };
        let start = int(self.start())?;
        match self.separator() {
            None => Some((start, start)),
            Some(RangeSeparator::GluedDash) => Some((start, int(self.end())?.checked_neg()?)),
            Some(_) => Some((start, int(self.end())?)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulticlassStatement<'a> {
    Assert(Assert<'a>),
    Def(Def<'a>),
    Defm(Defm<'a>),
    Defvar(Defvar<'a>),
    Foreach(Foreach<'a>),
    If(If<'a>),
    Let(Let<'a>),
}

impl<'a> MulticlassStatement<'a> {
    /// Narrows a statement to the forms allowed inside a multiclass.
    pub fn from_statement(statement: Statement<'a>) -> Option<Self> {
        Some(match statement {
            Statement::Assert(it) => MulticlassStatement::Assert(it),
            Statement::Def(it) => MulticlassStatement::Def(it),
            Statement::Defm(it) => MulticlassStatement::Defm(it),
            Statement::Defvar(it) => MulticlassStatement::Defvar(it),
            Statement::Foreach(it) => MulticlassStatement::Foreach(it),
            Statement::If(it) => MulticlassStatement::If(it),
            Statement::Let(it) => MulticlassStatement::Let(it),
            Statement::Class(_)
            | Statement::Defset(_)
            | Statement::Include(_)
            | Statement::Multiclass(_) => return None,
        })
    }
}

impl<'a> Node<'a> for MulticlassStatement<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        Statement::cast(syntax).and_then(Self::from_statement)
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            MulticlassStatement::Assert(it) => it.0,
            MulticlassStatement::Def(it) => it.0,
            MulticlassStatement::Defm(it) => it.0,
            MulticlassStatement::Defvar(it) => it.0,
            MulticlassStatement::Foreach(it) => it.0,
            MulticlassStatement::If(it) => it.0,
            MulticlassStatement::Let(it) => it.0,
        }
    }
}
