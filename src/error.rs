//! Error types shared by the page store, template renderer and router.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum WikiError {
    /// No page file exists for the title
    #[error("page not found: {0}")]
    NotFound(String),

    /// Request path does not match `/(edit|save|view)/<title>`
    #[error("invalid page path: {0}")]
    InvalidPath(String),

    /// Filesystem failure while reading or writing a page or template
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template could not be parsed or rendered
    #[error("template: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Pattern(#[from] regex_lite::Error),
}

impl WikiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
