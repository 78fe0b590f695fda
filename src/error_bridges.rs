//! Error bridge implementations for conversion errors.
//!
//! This module provides `impl From<X> for JupError` conversions from the
//! error types of the rewrite layer to the unified `JupError` type.
//!
//! These bridges live in the root crate rather than `jupgrade-core` because
//! they depend on types (`RulesError`, `ConvertError`) that core does not
//! know about.

use jupgrade_core::error::JupError;

use crate::convert::ConvertError;
use crate::rules::RulesError;

// ============================================================================
// Bridge: RulesError -> JupError
// ============================================================================

impl From<RulesError> for JupError {
    fn from(err: RulesError) -> Self {
        match &err {
            RulesError::Io { path, .. } if !path.exists() => {
                JupError::file_not_found(path.display().to_string())
            }
            _ => JupError::invalid_args(err.to_string()),
        }
    }
}

// ============================================================================
// Bridge: ConvertError -> JupError
// ============================================================================

impl From<ConvertError> for JupError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Parse { ref path, .. } | ConvertError::Serialize { ref path, .. } => {
                JupError::apply(err.to_string(), Some(path.clone()))
            }
            ConvertError::Rewrite { .. } => JupError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_core::error::OutputErrorCode;
    use jupgrade_java_cst::{NodeId, TreeError};
    use std::path::PathBuf;

    #[test]
    fn missing_rules_file_is_a_resolution_error() {
        let err = RulesError::Io {
            path: PathBuf::from("/nonexistent/rules.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let jup: JupError = err.into();
        assert_eq!(jup.error_code(), OutputErrorCode::ResolutionError);
    }

    #[test]
    fn convert_errors_map_to_codes() {
        let parse: JupError = ConvertError::Parse {
            path: "A.java".to_string(),
            line: 1,
            column: 2,
            snippet: String::new(),
        }
        .into();
        assert_eq!(parse.error_code(), OutputErrorCode::ApplyError);

        let rewrite: JupError = ConvertError::Rewrite {
            path: "A.java".to_string(),
            source: TreeError::MissingNode(NodeId::new(3)),
        }
        .into();
        assert_eq!(rewrite.error_code(), OutputErrorCode::InternalError);
    }
}
