use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use tablegen_errors::{DiagnosticKind, Severity};
use tablegen_inputs::File;
use tablegen_syntax::SyntaxKind::{self, *};
use tablegen_syntax::ast::{
    BodyItem, ForeachRange, Node as _, PrimitiveKind, Statement, Type, Value,
};
use tablegen_syntax::{BangOperator, NodeOrToken, ParentMap, SyntaxElement, WalkEvent};
use text_size::TextSize;

use crate::{FileParse, parse};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "td" {
                    let expected = path.with_extension("tree");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

#[test]
fn test_data() {
    let cases = TestCase::list();
    assert!(!cases.is_empty());

    for case in cases {
        let parse = parse(&case.text);
        assert_eq!(parse.tree().root().text(), case.text, "{}", case.input.display());
        expect_file![&case.expected].assert_eq(&parse.debug_dump());
    }
}

fn statements(text: &str) -> Vec<SyntaxKind> {
    parse(text).syntax().children().map(|node| node.kind()).collect()
}

fn errors(text: &str) -> Vec<String> {
    parse(text).diagnostics().iter().map(|d| d.message().to_owned()).collect()
}

#[test]
fn class_with_one_field() {
    let parse = parse("class Foo { int x = 5; }");
    assert!(parse.diagnostics().is_empty());

    let statements = parse.source_file().statements().collect::<Vec<_>>();
    let [Statement::Class(class)] = statements[..] else { panic!("{statements:?}") };
    assert_eq!(class.name().map(|name| name.text()), Some("Foo"));
    assert!(class.template_args().is_none());

    let record = class.record_body().unwrap();
    assert!(record.parent_class_list().is_none());

    let items = record.body().unwrap().items().collect::<Vec<_>>();
    let [BodyItem::Field(field)] = items[..] else { panic!("{items:?}") };
    let Some(Type::Primitive(ty)) = field.ty() else { panic!() };
    assert_eq!(ty.kind(), Some(PrimitiveKind::Int));
    assert_eq!(field.name().unwrap().text(), "x");
    let Some(Value::Integer(value)) = field.value() else { panic!() };
    assert_eq!(value.value(), Some(5));
}

#[test]
fn def_with_parent_arguments() {
    let parse = parse("def Bar : Foo<1,2>;");
    assert!(parse.diagnostics().is_empty());

    let Some(Statement::Def(def)) = parse.source_file().statements().next() else { panic!() };
    let Some(Value::Ident(name)) = def.name() else { panic!() };
    assert_eq!(name.text(), "Bar");

    let record = def.record_body().unwrap();
    let parents = record.parent_class_list().unwrap().classes().collect::<Vec<_>>();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].name().unwrap().text_trimmed(), "Foo");
    let args = parents[0]
        .args()
        .unwrap()
        .values()
        .map(|value| match value {
            Value::Integer(int) => int.value(),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(args, [Some(1), Some(2)]);
    assert!(record.body().unwrap().is_empty_form());
}

#[test]
fn foreach_over_dash_range() {
    let parse = parse("foreach i = 0-3 in def Rec#i;");
    assert!(parse.diagnostics().is_empty());

    let Some(Statement::Foreach(foreach)) = parse.source_file().statements().next() else {
        panic!()
    };
    let iterator = foreach.iterator().unwrap();
    assert_eq!(iterator.name().unwrap().text(), "i");
    let Some(ForeachRange::Piece(piece)) = iterator.range() else { panic!() };
    assert_eq!(piece.integer_bounds(), Some((0, 3)));

    let body = foreach.body().unwrap().statements().collect::<Vec<_>>();
    let [Statement::Def(def)] = body[..] else { panic!("{body:?}") };
    let Some(Value::Paste(paste)) = def.name() else { panic!() };
    let (Some(Value::Ident(lhs)), Some(Value::Ident(rhs))) = (paste.lhs(), paste.rhs()) else {
        panic!()
    };
    assert_eq!((lhs.text(), rhs.text()), ("Rec", "i"));
}

#[test]
fn unclosed_class_body() {
    let parse = parse("class Foo {");
    assert_eq!(parse.diagnostics().len(), 1);
    assert_eq!(parse.diagnostics()[0].kind(), DiagnosticKind::Syntax);

    let Some(Statement::Class(class)) = parse.source_file().statements().next() else { panic!() };
    assert!(class.record_body().and_then(|record| record.body()).is_some());
}

#[test]
fn bang_operation_arguments() {
    let parse = parse("defvar x = !add(1,2);");
    assert!(parse.diagnostics().is_empty());

    let Some(Statement::Defvar(defvar)) = parse.source_file().statements().next() else {
        panic!()
    };
    let Some(Value::Bang(bang)) = defvar.value() else { panic!() };
    assert_eq!(bang.operator(), Some(BangOperator::Add));
    assert!(bang.result_type().is_none());
    assert_eq!(bang.args().count(), 2);
}

#[test]
fn paste_nests_to_the_right() {
    let parse = parse("defvar x = A#B#C;");
    let Some(Statement::Defvar(defvar)) = parse.source_file().statements().next() else {
        panic!()
    };
    let Some(Value::Paste(outer)) = defvar.value() else { panic!() };
    let Some(Value::Ident(a)) = outer.lhs() else { panic!() };
    assert_eq!(a.text(), "A");
    let Some(Value::Paste(inner)) = outer.rhs() else { panic!() };
    assert_eq!(inner.syntax().text_trimmed(), "B#C");
}

#[test]
fn dangling_else_binds_to_inner_if() {
    let parse = parse("if X then if Y then def A; else def B;");
    assert!(parse.diagnostics().is_empty());

    let Some(Statement::If(outer)) = parse.source_file().statements().next() else { panic!() };
    assert!(outer.else_branch().is_none());

    let then = outer.then_branch().unwrap().statements().collect::<Vec<_>>();
    let [Statement::If(inner)] = then[..] else { panic!("{then:?}") };
    assert!(inner.else_branch().is_some());
}

#[test]
fn class_inside_multiclass_is_structural() {
    let parse = parse("multiclass M { class C; def D; }");
    let diagnostics = parse.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::Structural);
    assert_eq!(diagnostics[0].message(), "`class` is not allowed inside a multiclass");

    let Some(Statement::Multiclass(multiclass)) = parse.source_file().statements().next() else {
        panic!()
    };
    let body = multiclass.body().unwrap().statements().collect::<Vec<_>>();
    assert!(matches!(body[..], [Statement::Def(_)]));
}

#[test]
fn multiclass_restriction_reaches_nested_blocks() {
    let errors = errors("multiclass M { foreach i = 0...1 in { defset list<int> S = {} } }");
    assert_eq!(errors, ["`defset` is not allowed inside a multiclass"]);
}

#[test]
fn empty_multiclass_body() {
    assert_eq!(errors("multiclass M {}"), ["a multiclass body needs at least one statement"]);
    assert!(errors("multiclass M;").is_empty());
}

#[test]
fn unterminated_literals_report_once() {
    for text in ["def X { string s = \"abc", "def X { code c = [{ abc", "/* def X;"] {
        let parse = parse(text);
        let lexical = parse
            .diagnostics()
            .iter()
            .filter(|d| d.kind() == DiagnosticKind::Lexical)
            .collect::<Vec<_>>();
        assert_eq!(lexical.len(), 1, "{text}: {:?}", parse.diagnostics());
        assert_eq!(lexical[0].range().end(), TextSize::of(text), "{text}");
    }
}

#[test]
fn code_block_ends_at_first_close() {
    let parse = parse("def X { code c = [{ a }] b }]; }");
    let Some(Statement::Def(def)) = parse.source_file().statements().next() else { panic!() };
    let items = def.record_body().unwrap().body().unwrap().items().collect::<Vec<_>>();
    let Some(BodyItem::Field(field)) = items.first().copied() else { panic!() };
    let Some(Value::Code(code)) = field.value() else { panic!() };
    assert_eq!(code.code(), " a ");
    assert!(parse.has_errors());
}

#[test]
fn glued_negative_range_end_warns() {
    let parse = parse("foreach i = 0 -3 in def X#i;");
    let diagnostics = parse.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
    assert!(!parse.has_errors());

    let Some(Statement::Foreach(foreach)) = parse.source_file().statements().next() else {
        panic!()
    };
    let Some(ForeachRange::Piece(piece)) = foreach.iterator().unwrap().range() else { panic!() };
    assert_eq!(piece.integer_bounds(), Some((0, 3)));
}

#[test]
fn record_names_stop_before_body() {
    assert_eq!(statements("def A { } def B#C { }"), [DEF, DEF]);
    assert!(errors("def { int x; }").is_empty());
}

#[test]
fn stray_closing_brace_at_top_level() {
    assert_eq!(statements("} def A;"), [ERROR, DEF]);
    assert_eq!(errors("} def A;"), ["expected a statement"]);
}

#[test]
fn unclosed_body_stops_at_next_statement() {
    let text = "class A {\n  int x;\ndef B;\nforeach i = 0-1 in def C#i;\n";
    assert_eq!(statements(text), [CLASS, DEF, FOREACH]);
    assert_eq!(errors(text), ["expected `}`"]);

    let text = "class A {\n  5 6\ndef B;\n";
    assert_eq!(statements(text), [CLASS, DEF]);
    assert_eq!(errors(text), ["expected a field, `let`, `defvar` or `assert`", "expected `}`"]);
}

#[test]
fn mismatched_closer_reports_once() {
    let text = "defvar x = [1, 2);\ndef Ok;";
    assert_eq!(statements(text), [DEFVAR, ERROR, DEF]);
    assert_eq!(errors(text), ["expected `]`"]);
}

#[test]
fn missing_block_reports_once() {
    let text = "foreach i = 0-1 in garbage";
    assert_eq!(statements(text), [FOREACH, ERROR]);
    assert_eq!(errors(text), ["expected a statement or `{`"]);
}

#[test]
fn empty_sequence_is_an_error() {
    assert_eq!(errors("defvar x = {};"), ["a sequence needs at least one value"]);
}

#[test]
fn let_with_empty_list() {
    let parse = parse("let in def A;");
    assert!(parse.diagnostics().is_empty());

    let Some(Statement::Let(let_)) = parse.source_file().statements().next() else { panic!() };
    assert_eq!(let_.items().count(), 0);
    assert!(let_.body().is_some());
}

#[test]
fn round_trip_and_determinism() {
    let inputs = [
        "",
        "   // only a comment\n",
        "class A<int x = 1> : B<x>, C { let y = !if(x, \"a\", \"b\"); }",
        "multiclass M { def _#NAME : A; } defm X : M;",
        "#define FOO\n#ifdef FOO\ndef Y;\n#endif\n",
        "def \"broken { ]]] ) ( ;; } } class",
        "let x<0-3> = 1 in def Z;",
        "def X { bits<4> b = { 0, 1, ?, 1 }; string s = \"\\q\"; }",
        "!!!! $$ @@ \u{1F600} def",
        "/* unterminated",
    ];

    for text in inputs {
        let first = parse(text);
        let second = parse(text);
        assert_eq!(first, second, "{text:?}");
        assert_eq!(first.syntax().text(), text, "{text:?}");

        let tokens = first
            .syntax()
            .tokens()
            .map(|token| {
                let mut full = String::new();
                token.leading_trivia().for_each(|piece| full.push_str(piece.text));
                full.push_str(token.text_trimmed());
                token.trailing_trivia().for_each(|piece| full.push_str(piece.text));
                full
            })
            .collect::<String>();
        assert_eq!(tokens, text, "{text:?}");
    }
}

#[test]
fn every_node_is_closed() {
    let parse = parse("class A { int x = [1, 2 ; } def B : A<(ops $a, ;");
    let mut depth = 0i32;
    for event in parse.syntax().preorder() {
        match event {
            WalkEvent::Enter(_) => depth += 1,
            WalkEvent::Leave(_) => depth -= 1,
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
    assert!(parse.has_errors());
}

#[test]
fn preprocessor_directives_are_trivia() {
    let parse = parse("#ifdef X\ndef A;\n#else\ndef B;\n#endif\n");
    assert!(parse.diagnostics().is_empty());
    assert_eq!(
        parse.source_file().preprocessor_directives().collect::<Vec<_>>(),
        ["#ifdef X", "#else", "#endif"]
    );
    let is_trivia_token =
        |element: SyntaxElement<'_>| matches!(element, NodeOrToken::Token(token) if token.kind().is_trivia());
    assert!(!parse.syntax().children_with_tokens().any(is_trivia_token));
}

#[test]
fn file_parse_is_memoized() {
    let db = salsa::DatabaseImpl::new();
    let file = File::new(&db, "a.td".into(), "def A;".to_owned());

    let first = file.parse(&db) as *const _;
    let second = file.parse(&db) as *const _;
    assert_eq!(first, second);
    assert!(file.parse(&db).diagnostics().is_empty());
}

#[test]
fn parent_map_walks_up_to_the_file() {
    let parse = parse("class A { int x = 1; }");
    let root = parse.syntax();
    let parents = ParentMap::new(root);

    let integer = root.descendants().find(|node| node.kind() == INTEGER).unwrap();
    let ancestors = parents.ancestors(integer).map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(ancestors, [FIELD, BODY, RECORD_BODY, CLASS, SOURCE_FILE]);
    assert_eq!(parents.parent(root), None);
}
