#![forbid(unsafe_code)]

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to start or feed a pager session.
#[derive(Debug)]
pub enum PagerError {
    /// The file could not be opened or measured.
    Open { path: PathBuf, source: io::Error },
    Read(io::Error),
    /// `quote_regex` or `smileys` does not compile.
    Regex {
        option: &'static str,
        source: regex::Error,
    },
}

impl fmt::Display for PagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagerError::Open { path, source } => write!(f, "{}: {source}", path.display()),
            PagerError::Read(err) => write!(f, "read error: {err}"),
            PagerError::Regex { option, source } => write!(f, "{option}: {source}"),
        }
    }
}

impl std::error::Error for PagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PagerError::Open { source, .. } => Some(source),
            PagerError::Read(err) => Some(err),
            PagerError::Regex { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for PagerError {
    fn from(err: io::Error) -> Self {
        PagerError::Read(err)
    }
}

/// A search pattern that could not be used.
#[derive(Debug, Clone)]
pub enum SearchError {
    Pattern(regex::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Pattern(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Pattern(err) => Some(err),
        }
    }
}

impl From<regex::Error> for SearchError {
    fn from(err: regex::Error) -> Self {
        SearchError::Pattern(err)
    }
}
