//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading markdown content from disk
///
/// A missing content directory is not an error (it loads as an empty
/// collection) and an unknown slug is reported as `None`, so neither has a
/// variant here.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to list directory {path:?}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ContentError {
    /// Path of the file or directory that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            ContentError::ListDirectory { path, .. }
            | ContentError::Read { path, .. }
            | ContentError::FrontMatter { path, .. } => path,
        }
    }
}
