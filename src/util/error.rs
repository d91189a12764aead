//! Error types for graph archives.

use thiserror::Error;

/// Main error type for archive and graph codec operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Key written twice into the same write-mode scope
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Key requested from a read-mode scope that does not hold it
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Archive used in the wrong mode or outside its valid call sequence
    #[error("Invalid archive state: {0}")]
    InvalidState(String),

    /// Wrong accessor for the stored value variant or element type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Version tag that does not match a known schema
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(i64),

    /// Structural invariant violated (array length, dtype, rank, ...)
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Invalid magic bytes at start of archive
    #[error("Invalid graph archive: expected GRAR magic bytes")]
    InvalidMagic,

    /// Archive is truncated
    #[error("Unexpected end of archive at position {0}")]
    UnexpectedEof(u64),

    /// Payload failed its checksum or could not be decoded
    #[error("Corrupt archive: {0}")]
    Corrupt(String),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create a schema violation error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Create an invalid state error.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a corrupt payload error.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    /// Create a type mismatch error.
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type alias for graph archive operations.
pub type Result<T> = std::result::Result<T, Error>;
