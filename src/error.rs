// src/error.rs

use std::io;
use thiserror::Error;

/// Errors that abort an indexing run. Everything recoverable (missing
/// ignore files, uncompilable patterns, vanished walk entries) is handled
/// in place and never reaches this enum.
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid --since value '{0}': expected YYYY-MM-DD or RFC 3339")]
    InvalidSince(String),

    #[error("invalid --utc-offset value '{0}': must be within +/- 24 hours")]
    InvalidOffset(i32),
}

impl AtlasError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        AtlasError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
