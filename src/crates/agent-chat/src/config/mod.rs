//! Configuration management for agent-chat
//!
//! Supports dual-location config: `~/.agent-chat/config.toml` (user) and
//! `./.agent-chat/config.toml` (project), with project settings taking precedence.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{AuthorizationConfig, ChatConfig, LoggingConfig, ServerConfig};
