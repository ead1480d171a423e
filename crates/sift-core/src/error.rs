//! Unified error type for subsift.
//!
//! Hashing, resolution and configuration failures all funnel into [`Error`].
//! External lookups never surface here as fatal errors: providers report
//! them through a tagged outcome and the resolver degrades instead. The one
//! exception is [`Error::Cancelled`], which always propagates.

use std::path::PathBuf;

/// Unified error type covering all failure modes in subsift.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file is smaller than the two fingerprint windows.
    #[error("File too small to fingerprint: {size} bytes (need at least {min})")]
    FileTooSmall {
        /// Actual file size in bytes.
        size: u64,
        /// Minimum size required for a fingerprint.
        min: u64,
    },

    /// A file that was expected to exist could not be opened or read.
    #[error("IO error on {}: {source}", path.display())]
    FileIo {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O operation failed without a specific file attached.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external lookup failed.
    #[error("Lookup error [{provider}]: {message}")]
    Lookup {
        /// Name of the provider that failed.
        provider: String,
        /// Human-readable error description.
        message: String,
    },

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration could not be parsed or failed validation.
    #[error("Config error: {0}")]
    Config(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::FileIo`].
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::Lookup`].
    pub fn lookup(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Lookup {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
