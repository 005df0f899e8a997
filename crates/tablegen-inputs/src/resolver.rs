use std::io;

use camino::{Utf8Path, Utf8PathBuf};

/// Source text found for an `include` directive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedInclude {
    pub path: Utf8PathBuf,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("could not find include file `{name}`")]
    NotFound { name: String },

    #[error("could not read `{path}`")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Maps the file name of an `include "..."` directive to source text.
///
/// `from` is the path of the file containing the directive.
pub trait IncludeResolver {
    fn resolve(&self, from: &Utf8Path, name: &str) -> Result<ResolvedInclude, ResolveError>;

    /// The identity of `path`: two spellings of the same file must map to
    /// the same result.
    fn canonicalize(&self, path: &Utf8Path) -> Utf8PathBuf {
        path.to_owned()
    }
}

/// Looks up includes on disk: first next to the including file, then in each
/// include directory in order.
#[derive(Clone, Debug, Default)]
pub struct FsResolver {
    include_dirs: Vec<Utf8PathBuf>,
}

impl FsResolver {
    pub fn new(include_dirs: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        Self { include_dirs: include_dirs.into_iter().collect() }
    }

    pub fn include_dirs(&self) -> &[Utf8PathBuf] {
        &self.include_dirs
    }

    fn candidates<'a>(
        &'a self,
        from: &'a Utf8Path,
        name: &'a str,
    ) -> impl Iterator<Item = Utf8PathBuf> + 'a {
        from.parent()
            .into_iter()
            .chain(self.include_dirs.iter().map(Utf8PathBuf::as_path))
            .map(move |dir| dir.join(name))
    }
}

impl IncludeResolver for FsResolver {
    fn resolve(&self, from: &Utf8Path, name: &str) -> Result<ResolvedInclude, ResolveError> {
        for path in self.candidates(from, name) {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Ok(ResolvedInclude { path, text }),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ResolveError::Io { path, source }),
            }
        }

        Err(ResolveError::NotFound { name: name.to_owned() })
    }

    /// Resolves `..` and symlinks. Paths that no longer exist are kept as
    /// they are.
    fn canonicalize(&self, path: &Utf8Path) -> Utf8PathBuf {
        path.canonicalize_utf8().unwrap_or_else(|_| path.to_owned())
    }
}
