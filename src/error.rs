//! Error types for the matterfix library
//!
//! Only failures that stop a whole run surface as errors to the caller. Problems
//! with a single post or file are downgraded to an [`Outcome`](crate::batch::Outcome)
//! by the batch runner and never abort the batch.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum MatterFixError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Walking a directory tree failed
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Report serialization errors
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// The posts root directory does not exist
    #[error("Posts directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Reading or writing a single file failed
    #[error("Failed to access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid UTF-8 text
    #[error("File is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },

    /// A post's declared date is not a valid calendar date
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Moving a post directory failed
    #[error("Failed to move {from} to {to}: {source}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatterFixError>;

impl MatterFixError {
    /// Create a new root not found error
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound { path: path.into() }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::InvalidData {
            return Self::InvalidEncoding { path: path.into() };
        }
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn relocate(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Relocate {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether a run can carry on past this error.
    ///
    /// Per-item failures are recoverable; failures of the environment the
    /// whole run depends on are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FileAccess { .. }
            | Self::InvalidEncoding { .. }
            | Self::InvalidDate { .. }
            | Self::Relocate { .. }
            | Self::Validation { .. } => true,
            Self::Io(_)
            | Self::Walk(_)
            | Self::Regex(_)
            | Self::Serialization { .. }
            | Self::RootNotFound { .. } => false,
        }
    }
}

impl From<serde_json::Error> for MatterFixError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for MatterFixError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
