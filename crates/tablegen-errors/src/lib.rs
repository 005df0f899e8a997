use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// Which stage of the pipeline noticed the problem.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    /// Well-formed syntax in a place the grammar forbids it, such as a
    /// `class` inside a multiclass body.
    Structural,
    /// An `include` whose file could not be found or read.
    Include,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Severity::Warning => Level::Warning,
            Severity::Error => Level::Error,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[salsa::accumulator]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
    severity: Severity,
    kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(
        message: impl Into<String>,
        range: TextRange,
        severity: Severity,
        kind: DiagnosticKind,
    ) -> Self {
        Self { message: message.into(), range, severity, kind }
    }

    pub fn lexical(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(message, range, Severity::Error, DiagnosticKind::Lexical)
    }

    pub fn syntax(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(message, range, Severity::Error, DiagnosticKind::Syntax)
    }

    pub fn structural(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(message, range, Severity::Error, DiagnosticKind::Structural)
    }

    /// Downgrades the diagnostic to a warning.
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

/// Orders diagnostics by start offset, keeping the emission order of ties.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|diagnostic| diagnostic.range.start());
}
