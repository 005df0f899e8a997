use std::process::ExitCode;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tablegen_db::{Diagnostic, File, RootDatabase, check_file, load_includes};
use tablegen_errors::Renderer;
use tablegen_inputs::FsResolver;
use tablegen_parse::FileParse as _;

/// Parser front end for TableGen record descriptions.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print the syntax tree, then any diagnostics
    Parse { path: Utf8PathBuf },

    /// Print every token, trivia included, with its line and column
    Tokens { path: Utf8PathBuf },

    /// Check a file and everything it includes
    Check {
        path: Utf8PathBuf,

        /// Directory to search for included files
        #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
        include_dirs: Vec<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(log_level).with_writer(std::io::stderr).init();

    let db = RootDatabase::default();
    let renderer = Renderer::styled();

    match cli.command {
        Command::Parse { path } => {
            let file = open(&db, path)?;
            let parse = file.parse(&db);
            print!("{}", parse.tree().debug_dump());
            for diagnostic in parse.diagnostics() {
                report(&db, &renderer, file, diagnostic);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tokens { path } => {
            let file = open(&db, path)?;
            print_tokens(&db, file);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path, include_dirs } => {
            let root = open(&db, path)?;
            let graph = load_includes(&db, root, &FsResolver::new(include_dirs));
            tracing::info!(files = graph.files().len(), "loaded include graph");

            let mut failed = false;
            for &file in graph.files() {
                for diagnostic in &check_file::accumulated::<Diagnostic>(&db, file) {
                    failed |= report(&db, &renderer, file, diagnostic);
                }
            }
            for (file, diagnostic) in graph.diagnostics() {
                failed |= report(&db, &renderer, *file, diagnostic);
            }

            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
    }
}

fn open(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(File::new(db, path, text))
}

/// Renders `diagnostic` to stderr and returns whether it is an error.
fn report(db: &RootDatabase, renderer: &Renderer, file: File, diagnostic: &Diagnostic) -> bool {
    let path: &Utf8Path = file.path(db);
    eprintln!("{}", diagnostic.render(renderer, path.as_str(), file.text(db)));
    diagnostic.is_error()
}

fn print_tokens(db: &RootDatabase, file: File) {
    let line_index = file.line_index(db);
    let position = |offset| {
        let line_col = line_index.line_col(offset);
        format!("{}:{}", line_col.line + 1, line_col.col + 1)
    };

    for token in file.parse(db).syntax().tokens() {
        for trivia in token.leading_trivia() {
            let kind = trivia.syntax_kind();
            println!("{} {kind:?} {:?}", position(trivia.range.start()), trivia.text);
        }
        let start = token.trimmed_range().start();
        println!("{} {:?} {:?}", position(start), token.kind(), token.text_trimmed());
        for trivia in token.trailing_trivia() {
            let kind = trivia.syntax_kind();
            println!("{} {kind:?} {:?}", position(trivia.range.start()), trivia.text);
        }
    }
}
