use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid path {}: not a readable directory", .0.display())]
    InvalidPath(PathBuf),

    #[error("no catalog files found under {}", .0.display())]
    NoCorpusFound(PathBuf),

    #[error("malformed record at {}:{line}: expected 6 tab-separated fields, found {found}", .path.display())]
    MalformedRecord { path: PathBuf, line: usize, found: usize },

    #[error("cache artifact {} is missing or corrupt: {reason}", .path.display())]
    CacheCorrupt { path: PathBuf, reason: String },

    /// Non-fatal: callers keep using the in-memory index.
    #[error("could not write cache to {}: {reason}", .path.display())]
    CacheWrite { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
