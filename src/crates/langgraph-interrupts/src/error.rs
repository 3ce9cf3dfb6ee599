//! Error types for authorization interrupt handling
//!
//! Every failure raised while handling an authorization interrupt surfaces as an
//! [`AuthorizationError`]. The presentation layer branches on the variant to pick
//! a user-facing message; nothing in this crate swallows an error.
//!
//! # Error Hierarchy
//!
//! ```text
//! AuthorizationError
//! ├── InvalidAuthUrl   - Validator rejected the URL, no side effect happened
//! ├── Timeout          - Completion not observed before the deadline
//! ├── Cancelled        - The flow was abandoned through a cancel signal
//! └── Failed           - Anything else, wrapping an opaque cause
//! ```
//!
//! # Example
//!
//! ```rust
//! use langgraph_interrupts::{AuthorizationError, FailureKind};
//!
//! fn describe(err: &AuthorizationError) -> &'static str {
//!     match err.kind() {
//!         FailureKind::InvalidUrl => "link looks unsafe",
//!         FailureKind::Timeout => "took too long, try again",
//!         FailureKind::Cancelled => "cancelled",
//!         FailureKind::Failed => "authorization failed",
//!     }
//! }
//!
//! assert_eq!(describe(&AuthorizationError::Timeout), "took too long, try again");
//! ```

use thiserror::Error;

/// Opaque error returned by caller-supplied callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for authorization interrupt operations.
pub type Result<T> = std::result::Result<T, AuthorizationError>;

/// Message carried by failures that wrap a callback error.
pub const HANDLE_FAILED_MESSAGE: &str = "Failed to handle authorization interrupt";

/// Message carried by failures raised from the status predicate.
pub const STATUS_CHECK_FAILED_MESSAGE: &str = "Failed to check authorization status";

/// Errors that can occur while handling an authorization interrupt.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The configured validator rejected the authorization URL.
    #[error("Invalid authorization URL")]
    InvalidAuthUrl,

    /// Authorization completion was not observed within the deadline.
    #[error("Authorization timed out")]
    Timeout,

    /// The flow was abandoned before completion.
    #[error("Authorization cancelled")]
    Cancelled,

    /// Generic authorization failure with an optional underlying cause.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },
}

/// Coarse classification of an [`AuthorizationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Cancelled,
    Failed,
}

impl AuthorizationError {
    /// Create a generic failure without a cause.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a generic failure wrapping `cause`.
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Failed {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidAuthUrl => FailureKind::InvalidUrl,
            Self::Timeout => FailureKind::Timeout,
            Self::Cancelled => FailureKind::Cancelled,
            Self::Failed { .. } => FailureKind::Failed,
        }
    }

    pub fn is_invalid_url(&self) -> bool {
        matches!(self, Self::InvalidAuthUrl)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The wrapped cause of a generic failure, for diagnostics only.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Failed { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }
}
