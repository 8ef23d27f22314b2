//! Defines the [`Error`] type shared by every stage of a build. Every variant
//! is fatal: a single bad content file aborts the whole build, and whatever
//! was written before the failure is left on disk.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building a site or blog.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when `site.yml` or `blog.yml` is missing, malformed, or is
    /// missing a required key (or e.g., `max_posts` isn't positive).
    #[error("configuration `{}`: {message}", .path.display())]
    Configuration { path: PathBuf, message: String },

    /// Returned when a content file doesn't contain exactly one `---`
    /// delimiter line.
    #[error("expected exactly one `---` delimiter line, found {found}")]
    Parse { found: usize },

    /// Returned when the metadata block isn't a YAML mapping, or when a
    /// required field is missing or malformed.
    #[error("metadata: {0}")]
    Metadata(String),

    /// Returned when a page or blog references a template file that doesn't
    /// exist in the template directory.
    #[error("template not found: `{}`", .0.display())]
    TemplateNotFound(PathBuf),

    /// Returned when a template can't be parsed or executed.
    #[error("template `{}`: {message}", .path.display())]
    Template { path: PathBuf, message: String },

    /// Returned when a rendered page can't be written, typically because its
    /// parent directory doesn't exist.
    #[error("writing `{}`: {err}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned for other I/O problems: reading sources, creating output
    /// directories, copying assets, walking the input tree.
    #[error("`{}`: {err}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// An error with an annotation, usually the source file being built.
    #[error("{0}: {1}")]
    Annotated(String, #[source] Box<Error>),
}

impl Error {
    /// Strips any annotations and returns the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Annotated(_, inner) => inner.root(),
            err => err,
        }
    }

    pub(crate) fn fs(path: &Path, err: io::Error) -> Error {
        Error::FileSystem {
            path: path.to_owned(),
            err,
        }
    }

    pub(crate) fn annotate(self, path: &Path) -> Error {
        Error::Annotated(format!("building `{}`", path.display()), Box::new(self))
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error::FileSystem`]. This
    /// allows us to use the `?` operator while walking the input tree.
    fn from(err: walkdir::Error) -> Error {
        let path = err.path().map(Path::to_owned).unwrap_or_default();
        Error::FileSystem {
            path,
            err: err.into(),
        }
    }
}
