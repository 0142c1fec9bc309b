use std::path::PathBuf;
use thiserror::Error;

/// Failures while deriving keys, encrypting, or decrypting.
///
/// A wrong password and a tampered archive are deliberately reported as the
/// same `Authentication` variant — callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("data is too short to be a valid encrypted archive")]
    TooShort,

    #[error("authentication failed — wrong password or corrupted archive")]
    Authentication,

    #[error("system random number generator failed: {0}")]
    Random(String),

    #[error("encryption failed: {0}")]
    Encrypt(String),
}

/// Failures during the filesystem walk.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while building, parsing, or extracting an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("no files to pack")]
    Empty,

    #[error("invalid archive format: {0}")]
    Format(String),

    #[error("unsafe path in archive entry: {0}")]
    UnsafePath(String),

    #[error("failed to {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Caller-supplied options that violate a precondition.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("scan depth must be between 1 and 10 (got {got})")]
    Depth { got: usize },

    #[error("max file size must be greater than zero")]
    MaxFileSize,

    #[error("at least one include pattern is required")]
    NoPatterns,
}

/// Umbrella error covering everything the crate can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error: {0}")]
    Config(String),

    #[error("{0}")]
    Command(String),
}

/// Convenience type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
