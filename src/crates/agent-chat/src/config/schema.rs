//! Configuration schema for agent-chat
//!
//! ```toml
//! [server]
//! api_url = "http://localhost:2024"
//! assistant_id = "graph"
//! api_key = "${LANGSMITH_API_KEY}"
//! user_id = "me@example.com"
//!
//! [authorization]
//! timeout_ms = 300000
//! poll_interval_ms = 2000
//! open_browser = true
//!
//! [settings]
//! model = "openai/gpt-4"
//!
//! [proxy]
//! host = "127.0.0.1"
//! port = 3001
//!
//! [logging]
//! level = "info"
//! ```

use langgraph_client::config::{env_flag, env_var};
use langgraph_client::{AgentSettings, ProxyConfig, API_KEY_ENV};
use langgraph_interrupts::HandlerConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:2024";
pub const DEFAULT_ASSISTANT_ID: &str = "graph";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub server: ServerConfig,
    pub authorization: AuthorizationConfig,
    /// Agent settings pushed by `agent-chat settings`.
    pub settings: AgentSettings,
    pub proxy: ProxyConfig,
    pub logging: LoggingConfig,
}

/// LangGraph deployment to talk to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_url: String,
    pub assistant_id: String,
    /// Falls back to `LANGSMITH_API_KEY` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Owner recorded in thread metadata; used to filter thread search.
    pub user_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            assistant_id: DEFAULT_ASSISTANT_ID.to_string(),
            api_key: None,
            user_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    #[serde(flatten)]
    pub handler: HandlerConfig,
    /// Launch the system browser; when false the URL is only printed.
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            handler: HandlerConfig::default(),
            open_browser: true,
        }
    }
}

fn default_open_browser() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ChatConfig {
    /// Apply environment overrides.
    ///
    /// `LANGGRAPH_API_URL`, `LANGGRAPH_ASSISTANT_ID`, `AGENT_CHAT_USER_ID`,
    /// `LANGSMITH_API_KEY` (only when no key is configured) and
    /// `AGENT_CHAT_OPEN_BROWSER`. `${VAR}` in `server.api_key` is expanded.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(api_url) = env_var("LANGGRAPH_API_URL") {
            self.server.api_url = api_url;
        }
        if let Some(assistant_id) = env_var("LANGGRAPH_ASSISTANT_ID") {
            self.server.assistant_id = assistant_id;
        }
        if let Some(user_id) = env_var("AGENT_CHAT_USER_ID") {
            self.server.user_id = user_id;
        }

        self.server.api_key = match self.server.api_key.take() {
            Some(key) => Some(expand_env_var(&key)),
            None => env_var(API_KEY_ENV),
        }
        .filter(|key| !key.is_empty());

        if let Some(open_browser) = env_flag("AGENT_CHAT_OPEN_BROWSER")? {
            self.authorization.open_browser = open_browser;
        }
        Ok(())
    }

    /// Settings to push, owned by the configured user when one is set.
    pub fn agent_settings(&self) -> AgentSettings {
        let mut settings = self.settings.clone();
        if !self.server.user_id.is_empty() {
            settings.user_id = self.server.user_id.clone();
        }
        settings
    }
}

/// Expand a whole-value `${VAR_NAME}` reference, leaving it as-is if unset.
fn expand_env_var(value: &str) -> String {
    match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => std::env::var(var_name).unwrap_or_else(|_| value.to_string()),
        None => value.to_string(),
    }
}
