//! Asset loading error types.

use std::path::PathBuf;

/// Errors that can occur while loading assets from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Failed to read a file from disk.
    #[error("failed to read asset {path}: {source}")]
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A line of an OBJ file could not be parsed.
    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse {
        /// 1-based line number of the offending line.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The OBJ file parsed but produced no geometry.
    #[error("OBJ file contains no faces")]
    EmptyMesh,
}
