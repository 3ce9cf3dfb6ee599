//! CLI command implementations
//!
//! Provides command handlers for the agent-chat binary.

pub mod interrupt;
pub mod proxy;
pub mod server;

use crate::config::ChatConfig;
use crate::error::Result;
use langgraph_client::GraphClient;

/// Client for the configured LangGraph deployment.
pub fn graph_client(config: &ChatConfig) -> Result<GraphClient> {
    Ok(GraphClient::new(
        &config.server.api_url,
        config.server.api_key.as_deref(),
    )?)
}
