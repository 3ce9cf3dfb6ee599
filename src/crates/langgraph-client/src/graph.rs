//! LangGraph server client
//!
//! Thin typed wrapper over the LangGraph server REST API covering what the chat
//! client needs: an availability probe, thread state reads, resuming a paused
//! run, pushing agent settings and listing a user's threads.

use chrono::{DateTime, Utc};
use langgraph_interrupts::AuthorizationInterrupt;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::client::{ClientConfig, HttpClient};
use crate::error::Result;

/// Key under which interrupts surface in thread values.
const INTERRUPT_VALUES_KEY: &str = "__interrupt__";

/// Snapshot of a thread returned by `GET /threads/{id}/state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadState {
    #[serde(default)]
    pub values: Value,

    /// Nodes scheduled to run next; empty once the run is finished.
    #[serde(default)]
    pub next: Vec<String>,

    #[serde(default)]
    pub tasks: Vec<ThreadTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub interrupts: Vec<TaskInterrupt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInterrupt {
    pub value: Value,
    #[serde(default)]
    pub resumable: Option<bool>,
}

impl ThreadState {
    /// First pending authorization interrupt, looking at task interrupts and
    /// then at `values.__interrupt__`.
    pub fn authorization_interrupt(&self) -> Option<AuthorizationInterrupt> {
        let from_tasks = self
            .tasks
            .iter()
            .flat_map(|task| task.interrupts.iter())
            .find_map(|interrupt| AuthorizationInterrupt::from_value(&interrupt.value));
        if from_tasks.is_some() {
            return from_tasks;
        }

        match self.values.get(INTERRUPT_VALUES_KEY)? {
            Value::Array(items) => items.iter().find_map(interrupt_payload),
            other => interrupt_payload(other),
        }
    }

    /// Whether the thread is paused waiting on input.
    pub fn is_interrupted(&self) -> bool {
        self.tasks.iter().any(|task| !task.interrupts.is_empty())
    }
}

fn interrupt_payload(item: &Value) -> Option<AuthorizationInterrupt> {
    item.get("value")
        .and_then(AuthorizationInterrupt::from_value)
        .or_else(|| AuthorizationInterrupt::from_value(item))
}

/// Per-thread agent configuration, sent as `config.configurable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub system_prompt: String,
    pub model: String,
    pub max_search_results: u32,
    pub user_id: String,
    pub debug_mode: bool,
    pub log_level: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful AI assistant.".to_string(),
            model: "openai/gpt-4".to_string(),
            max_search_results: 10,
            user_id: "agent-chat-ui-vercel-key".to_string(),
            debug_mode: false,
            log_level: "INFO".to_string(),
        }
    }
}

/// Entry of `POST /threads/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub values: Value,
}

impl ThreadSummary {
    /// Text of the first message, or the thread id when there is none.
    pub fn label(&self) -> String {
        self.values
            .get("messages")
            .and_then(|messages| messages.get(0))
            .and_then(|message| message.get("content"))
            .and_then(content_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| self.thread_id.clone())
    }
}

/// Message content is either a string or a list of typed parts.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let text: Vec<&str> = parts
                .iter()
                .filter(|part| part.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            Some(text.join(" "))
        }
        _ => None,
    }
}

/// Client for one LangGraph server deployment.
#[derive(Debug, Clone)]
pub struct GraphClient {
    api_url: String,
    http: HttpClient,
}

impl GraphClient {
    /// Connect to `api_url`, authenticating with `api_key` or `LANGSMITH_API_KEY`.
    pub fn new(api_url: impl Into<String>, api_key: Option<&str>) -> Result<Self> {
        Self::with_config(api_url, ClientConfig::new().with_api_key(api_key))
    }

    pub fn with_config(api_url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            api_url,
            http: HttpClient::new(config)?,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// `true` when `GET /info` succeeds.
    pub async fn check_status(&self) -> bool {
        match self.http.send(Method::GET, &self.url("/info"), None::<&()>).await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(status = response.status().as_u16(), api_url = %self.api_url, "LangGraph server not ready");
                false
            }
            Err(e) => {
                warn!(error = %e, api_url = %self.api_url, "Failed to reach LangGraph server");
                false
            }
        }
    }

    pub async fn get_state(&self, thread_id: &str) -> Result<ThreadState> {
        debug!(thread_id, "Fetching thread state");
        self.http.get_json(&self.url(&format!("/threads/{}/state", thread_id))).await
    }

    /// Resume the interrupted run on `thread_id` and wait for it to finish.
    pub async fn resume(&self, thread_id: &str, assistant_id: &str, resume: Value) -> Result<Value> {
        info!(thread_id, assistant_id, "Resuming thread");
        let body = json!({
            "assistant_id": assistant_id,
            "command": { "resume": resume },
        });
        self.http
            .post_json(&self.url(&format!("/threads/{}/runs/wait", thread_id)), &body)
            .await
    }

    /// Submit a run on `thread_id` carrying `settings` as its configurable values.
    pub async fn update_settings(&self, thread_id: &str, assistant_id: &str, settings: &AgentSettings) -> Result<Value> {
        info!(thread_id, model = %settings.model, "Updating agent settings");
        let body = json!({
            "assistant_id": assistant_id,
            "config": { "configurable": settings },
        });
        self.http
            .post_json(&self.url(&format!("/threads/{}/runs/wait", thread_id)), &body)
            .await
    }

    /// Threads owned by `user_id` (all threads when empty), most recent first.
    pub async fn search_threads(&self, user_id: &str, limit: usize) -> Result<Vec<ThreadSummary>> {
        let mut body = json!({ "limit": limit });
        if !user_id.is_empty() {
            body["metadata"] = json!({ "user_id": user_id });
        }
        let mut threads: Vec<ThreadSummary> = self.http.post_json(&self.url("/threads/search"), &body).await?;
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(threads)
    }
}
