//! Error types for org-walker
//!
//! This module defines the error hierarchy covering:
//! - Remote Organizations API errors
//! - Configuration and CLI errors
//! - Fatal traversal errors
//! - Tree accumulation errors
//!
//! Per-node collaborator failures during a traversal are not raised as
//! errors; they are isolated, recorded, and returned in the traversal
//! report (see the walker module).

use crate::walker::traits::SourceError;
use thiserror::Error;

/// Top-level error type for the org-walker application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Remote Organizations API errors
    #[error("organizations API error: {0}")]
    Api(#[from] OrgApiError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fatal traversal errors
    #[error("traversal error: {0}")]
    Traverse(#[from] TraverseError),

    /// Tree accumulation errors
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// I/O errors (snapshot loading, output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors (snapshot parsing, export)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remote Organizations API errors
///
/// The walker has no retry policy; implementations that want retries
/// perform them before surfacing an error here.
#[derive(Error, Debug, Clone)]
pub enum OrgApiError {
    /// The provider throttled the request
    #[error("request throttled: {message}")]
    Throttled { message: String },

    /// The listed parent does not exist
    #[error("parent '{parent_id}' not found")]
    ParentNotFound { parent_id: String },

    /// Caller is not authorized for the listing call
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// A pagination token the provider does not recognize
    #[error("invalid pagination token '{token}'")]
    InvalidToken { token: String },

    /// Any other provider error
    #[error("API error: {message}")]
    Api { message: String },
}

impl OrgApiError {
    /// Check if a caller-side retry could help
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrgApiError::Throttled { .. })
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid poll timeout
    #[error("invalid poll timeout {millis} ms: must be at least {min} ms")]
    InvalidPollTimeout { millis: u64, min: u64 },

    /// Invalid snapshot page size
    #[error("invalid page size {size}: must be at least 1")]
    InvalidPageSize { size: usize },

    /// Node label template failed to parse
    #[error("invalid node format '{template}': {reason}")]
    InvalidNodeFormat { template: String, reason: String },
}

/// Fatal traversal errors
///
/// These abort the whole run; per-node failures do not.
#[derive(Error, Debug)]
pub enum TraverseError {
    /// The root source failed; nothing was traversed
    #[error("failed to list roots: {0}")]
    Roots(SourceError),

    /// A worker thread could not be started
    #[error("failed to start worker {id}: {reason}")]
    WorkerSpawn { id: usize, reason: String },
}

/// Tree accumulation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A node with this identifier was already inserted
    #[error("node '{id}' was already inserted")]
    DuplicateNode { id: String },

    /// The referenced parent has not been inserted
    #[error("parent '{id}' has not been inserted")]
    UnknownParent { id: String },
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_retryable() {
        let throttled = OrgApiError::Throttled {
            message: "rate exceeded".into(),
        };
        assert!(throttled.is_retryable());

        let denied = OrgApiError::AccessDenied {
            message: "no organizations:ListRoots".into(),
        };
        assert!(!denied.is_retryable());
    }

    #[test]
    fn test_error_conversion() {
        let api_err = OrgApiError::ParentNotFound {
            parent_id: "ou-missing".into(),
        };
        let walker_err: WalkerError = api_err.into();
        assert!(matches!(walker_err, WalkerError::Api(_)));
    }
}
