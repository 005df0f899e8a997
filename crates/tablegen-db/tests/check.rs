use std::borrow::Borrow;

use camino::{Utf8Path, Utf8PathBuf};
use salsa::Setter as _;
use tablegen_db::{Diagnostic, File, RootDatabase, check_file, includes, load_includes};
use tablegen_errors::{DiagnosticKind, Renderer};
use tablegen_inputs::{FsResolver, IncludeResolver, ResolveError, ResolvedInclude};

#[derive(Debug, PartialEq, Eq)]
struct ExpectedDiag {
    line: usize,
    message: String,
}

#[derive(Debug, PartialEq, Eq)]
struct ActualDiag {
    line: usize,
    message: String,
}

fn parse_expectations(fixture: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((_, comment)) = line.split_once("//~") else {
            continue;
        };
        let comment = comment.trim();
        let comment = comment.strip_prefix("ERROR").unwrap_or(comment).trim();
        if comment.is_empty() {
            continue;
        }
        expected.push(ExpectedDiag { line: idx + 1, message: comment.to_owned() });
    }

    expected
}

fn collect_actual<D: Borrow<Diagnostic>>(
    db: &RootDatabase,
    file: File,
    diagnostics: impl IntoIterator<Item = D>,
) -> Vec<ActualDiag> {
    let line_index = file.line_index(db);
    let mut actual = diagnostics
        .into_iter()
        .map(|diag| {
            let diag = diag.borrow();
            let line = line_index.line_col(diag.range().start()).line as usize + 1;
            ActualDiag { line, message: diag.message().to_owned() }
        })
        .collect::<Vec<_>>();
    actual.sort_by_key(|diag| (diag.line, diag.message.clone()));
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let db = RootDatabase::default();
    let file = File::new(&db, "check.td".into(), fixture.to_owned());

    let diagnostics = check_file::accumulated::<Diagnostic>(&db, file);
    let mut actual = collect_actual(&db, file, diagnostics);
    let mut expected = parse_expectations(fixture);

    expected.sort_by_key(|diag| (diag.line, diag.message.clone()));

    assert_eq!(
        expected.len(),
        actual.len(),
        "expected {} diagnostic(s), got {}\nexpected: {expected:#?}\nactual: {actual:#?}",
        expected.len(),
        actual.len(),
    );

    for expected_diag in expected {
        let Some(pos) = actual.iter().position(|diag| {
            diag.line == expected_diag.line && diag.message.contains(&expected_diag.message)
        }) else {
            panic!(
                "missing diagnostic on line {} containing `{}`\nactual: {actual:#?}",
                expected_diag.line, expected_diag.message
            );
        };
        actual.remove(pos);
    }

    assert!(actual.is_empty(), "unexpected diagnostics:\n{actual:#?}");
}

#[test]
fn clean_file() {
    check(
        r#"
class Reg<bits<16> enc> {
  bits<16> Encoding = enc;
}
def R0 : Reg<0>;
"#,
    );
}

#[test]
fn missing_value() {
    check(
        r#"
class A {
  int x = ; //~ ERROR expected a value
}
"#,
    );
}

#[test]
fn unknown_bang_operator() {
    check(
        r#"
defvar x = !frobnicate(1); //~ ERROR unknown bang operator `!frobnicate`
"#,
    );
}

#[test]
fn statement_not_allowed_in_multiclass() {
    check(
        r#"
multiclass M {
  def A;
  include "x.td" //~ ERROR `include` is not allowed inside a multiclass
}
"#,
    );
}

#[test]
fn includes_lists_nested_directives() {
    let db = RootDatabase::default();
    let text = "include \"a.td\"\nlet x = 1 in {\n  include \"b.td\"\n}\n";
    let file = File::new(&db, "main.td".into(), text.to_owned());

    let names =
        includes(&db, file).iter().map(|include| include.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["a.td", "b.td"]);

    let first = &includes(&db, file)[0];
    assert_eq!(&text[first.range], "\"a.td\"");
}

#[test]
fn edits_are_reparsed() {
    let mut db = RootDatabase::default();
    let file = File::new(&db, "main.td".into(), "def A;".to_owned());
    assert!(check_file::accumulated::<Diagnostic>(&db, file).is_empty());

    file.set_text(&mut db).to("def A".to_owned());
    assert_eq!(check_file::accumulated::<Diagnostic>(&db, file).len(), 1);
}

#[test]
fn rendered_diagnostic_points_at_source() {
    let db = RootDatabase::default();
    let file = File::new(&db, "main.td".into(), "class Foo {\n".to_owned());

    let diagnostics = check_file::accumulated::<Diagnostic>(&db, file);
    assert_eq!(diagnostics.len(), 1);
    let rendered = diagnostics[0]
        .render(&Renderer::plain(), file.path(&db).as_str(), file.text(&db))
        .to_string();
    assert!(rendered.contains("expected `}`"), "{rendered}");
    assert!(rendered.contains("main.td"), "{rendered}");
}

/// Resolves includes from an in-memory list of `(path, text)` pairs; names
/// are looked up as-is.
struct MemoryResolver(Vec<(&'static str, &'static str)>);

impl IncludeResolver for MemoryResolver {
    fn resolve(&self, _from: &Utf8Path, name: &str) -> Result<ResolvedInclude, ResolveError> {
        self.0
            .iter()
            .find(|(path, _)| *path == name)
            .map(|&(path, text)| ResolvedInclude { path: path.into(), text: text.to_owned() })
            .ok_or_else(|| ResolveError::NotFound { name: name.to_owned() })
    }
}

fn paths(db: &RootDatabase, files: impl IntoIterator<Item = File>) -> Vec<String> {
    files.into_iter().map(|file| file.path(db).to_string()).collect()
}

#[test]
fn include_cycle_terminates() {
    let db = RootDatabase::default();
    let root = File::new(&db, "main.td".into(), "include \"a.td\"".to_owned());
    let resolver = MemoryResolver(vec![
        ("main.td", "include \"a.td\""),
        ("a.td", "include \"b.td\"\ndef A;"),
        ("b.td", "include \"a.td\"\ninclude \"main.td\"\ndef B;"),
    ]);

    let graph = load_includes(&db, root, &resolver);
    assert_eq!(paths(&db, graph.files().iter().copied()), ["main.td", "a.td", "b.td"]);
    assert!(graph.diagnostics().is_empty());

    let b = graph.files()[2];
    assert_eq!(paths(&db, graph.included_by(b)), ["a.td", "main.td"]);
    assert_eq!(graph.root(), root);
}

#[test]
fn diamond_loads_each_file_once() {
    let db = RootDatabase::default();
    let text = "include \"a.td\"\ninclude \"b.td\"";
    let root = File::new(&db, "main.td".into(), text.to_owned());
    let resolver = MemoryResolver(vec![
        ("a.td", "include \"common.td\""),
        ("b.td", "include \"common.td\""),
        ("common.td", "class Common;"),
    ]);

    let graph = load_includes(&db, root, &resolver);
    assert_eq!(
        paths(&db, graph.files().iter().copied()),
        ["main.td", "a.td", "b.td", "common.td"]
    );
}

#[test]
fn unresolved_include_is_reported() {
    let db = RootDatabase::default();
    let text = "def A;\ninclude \"missing.td\"\n";
    let root = File::new(&db, "main.td".into(), text.to_owned());

    let graph = load_includes(&db, root, &MemoryResolver(Vec::new()));
    assert_eq!(graph.files(), [root]);

    let [(file, diagnostic)] = graph.diagnostics() else { panic!("{:?}", graph.diagnostics()) };
    assert_eq!(*file, root);
    assert_eq!(diagnostic.kind(), DiagnosticKind::Include);
    assert_eq!(diagnostic.message(), "could not find include file `missing.td`");
    assert_eq!(&text[diagnostic.range()], "\"missing.td\"");
}

#[test]
fn self_include_through_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
    std::fs::create_dir(root.join("x")).unwrap();
    let text = "include \"../x/a.td\"\n";
    std::fs::write(root.join("x/a.td"), text).unwrap();

    let db = RootDatabase::default();
    let file = File::new(&db, root.join("x/a.td"), text.to_owned());
    let graph = load_includes(&db, file, &FsResolver::default());

    assert_eq!(graph.files(), [file]);
    assert!(graph.diagnostics().is_empty(), "{:?}", graph.diagnostics());
    assert_eq!(graph.included_by(file).collect::<Vec<_>>(), [file]);
}
