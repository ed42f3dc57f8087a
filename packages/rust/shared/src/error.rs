//! Error types for ytextract.
//!
//! Library crates use [`ExtractError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all extraction operations.
///
/// `Unrecognized` and `NotFound` are deliberately separate: the first means the
/// input did not look like the expected kind of document at all, the second
/// means it did but a specific field was missing.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input did not look like the expected kind of document.
    #[error("unrecognized input: {message}")]
    Unrecognized { message: String },

    /// Input looked right, but the expected value was not in it.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// JSON or XML was structurally malformed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// An unknown format discriminator was requested.
    #[error("unsupported: {message}")]
    Unsupported { message: String },

    /// Every transcript candidate was exhausted without producing text.
    #[error("no transcript available for video {video_id}")]
    NoTranscript { video_id: String },

    /// A value failed its shape predicate (channel id, video id, URL).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unrecognized(msg: impl Into<String>) -> Self {
        Self::Unrecognized {
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
