//! Error types for agent-chat
//!
//! Provides a unified error type for command handlers.

use langgraph_client::ClientError;
use thiserror::Error;

/// Result type alias for agent-chat operations
pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LangGraph server unreachable
    #[error("Failed to connect to LangGraph server at {api_url}")]
    Unreachable { api_url: String },

    /// Thread has no pending authorization interrupt
    #[error("Thread {0} has no pending authorization interrupt")]
    NoInterrupt(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// Prompt closed without completing or cancelling authorization
    #[error("Authorization not completed: {0}")]
    AuthorizationIncomplete(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
