//! Error types and error code constants for jupgrade.
//!
//! This module provides a unified error type (`JupError`) that bridges
//! domain-specific errors from different subsystems (file discovery,
//! conversion, output) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (path not found)
//! - `4`: Apply errors (one or more files failed to convert or persist)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::files::FileError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad glob, unreadable rule table).
    InvalidArguments = 2,
    /// Resolution errors (path not found).
    ResolutionError = 3,
    /// Apply errors (a file failed to convert or could not be written).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum JupError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// File or directory not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// One or more files failed.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&JupError> for OutputErrorCode {
    fn from(err: &JupError) -> Self {
        match err {
            JupError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            JupError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            JupError::ApplyError { .. } => OutputErrorCode::ApplyError,
            JupError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<JupError> for OutputErrorCode {
    fn from(err: JupError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridge: FileError -> JupError
// ============================================================================

impl From<FileError> for JupError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::InvalidPattern { .. } => JupError::invalid_args(err.to_string()),
            FileError::NotFound { path } => JupError::FileNotFound {
                path: path.display().to_string(),
            },
            FileError::Io { path, source } => JupError::ApplyError {
                message: source.to_string(),
                file: Some(path.display().to_string()),
            },
            FileError::Walk(walk_err) => JupError::InternalError {
                message: format!("directory walk failed: {}", walk_err),
            },
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl JupError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        JupError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        JupError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        JupError::FileNotFound { path: path.into() }
    }

    /// Create an apply error.
    pub fn apply(message: impl Into<String>, file: Option<String>) -> Self {
        JupError::ApplyError {
            message: message.into(),
            file,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        JupError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
