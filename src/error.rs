//! Error enum
use std::fmt;
use std::path::PathBuf;

use crate::translation::TranslateError;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Sqlite(rusqlite::Error),
    Http(reqwest::Error),
    Serde(serde_json::Error),
    /// A `<doc …>` line that lacks one of the `id`, `url`, `title` attributes.
    MalformedHeader {
        path: PathBuf,
        line: usize,
        header: String,
    },
    /// A translation request that failed in a non-recoverable way.
    Translation {
        chunk: usize,
        source: TranslateError,
    },
    /// A failed title lookup.
    Lookup {
        article_id: String,
        source: Box<Error>,
    },
    /// Wraps an error that happened while working on a given file.
    File {
        path: PathBuf,
        source: Box<Error>,
    },
    Custom(String),
}

impl Error {
    /// Attach the path of the file being processed to an error.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // already carries its path
            Error::MalformedHeader { .. } | Error::File { .. } => self,
            e => Error::File {
                path: path.into(),
                source: Box::new(e),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Csv(e) => write!(f, "tsv error: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Error::Sqlite(e) => write!(f, "lookup store error: {e}"),
            Error::Http(e) => write!(f, "http error: {e}"),
            Error::Serde(e) => write!(f, "json error: {e}"),
            Error::MalformedHeader { path, line, header } => write!(
                f,
                "malformed document header in {:?} at line {}: {}",
                path, line, header
            ),
            Error::Translation { chunk, source } => {
                write!(f, "translation of chunk {chunk} failed: {source}")
            }
            Error::Lookup { article_id, source } => {
                write!(f, "lookup for article {article_id} failed: {source}")
            }
            Error::File { path, source } => write!(f, "{:?}: {}", path, source),
            Error::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Error {
        Error::Sqlite(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
