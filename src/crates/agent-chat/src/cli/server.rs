//! Server-facing command handlers: connectivity, settings, thread listing

use colored::Colorize;
use langgraph_client::{AgentSettings, GraphClient, ThreadSummary};
use tabled::{Table, Tabled};
use tracing::info;

use crate::cli::graph_client;
use crate::config::ChatConfig;
use crate::error::{ChatError, Result};

/// Handle `check`
pub async fn handle_check(config: &ChatConfig) -> Result<()> {
    let client = graph_client(config)?;
    ensure_reachable(&client).await?;
    println!("{} Connected to LangGraph server at {}", "✓".green(), client.api_url());
    Ok(())
}

/// Fail with the connection hint when `/info` does not answer.
pub async fn ensure_reachable(client: &GraphClient) -> Result<()> {
    if client.check_status().await {
        return Ok(());
    }
    eprintln!("{}", "Failed to connect to LangGraph server".red().bold());
    eprintln!(
        "  Please ensure your graph is running at {} and your API key is set correctly (if connecting to a deployed graph).",
        client.api_url()
    );
    Err(ChatError::Unreachable {
        api_url: client.api_url().to_string(),
    })
}

/// Command-line overrides of the configured agent settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub system_prompt: Option<String>,
    pub model: Option<String>,
    pub max_search_results: Option<u32>,
    pub debug_mode: Option<bool>,
    pub log_level: Option<String>,
}

impl SettingsOverrides {
    pub fn apply(self, mut settings: AgentSettings) -> AgentSettings {
        if let Some(system_prompt) = self.system_prompt {
            settings.system_prompt = system_prompt;
        }
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(max_search_results) = self.max_search_results {
            settings.max_search_results = max_search_results;
        }
        if let Some(debug_mode) = self.debug_mode {
            settings.debug_mode = debug_mode;
        }
        if let Some(log_level) = self.log_level {
            settings.log_level = log_level.to_uppercase();
        }
        settings
    }
}

/// Handle `settings`
pub async fn handle_settings(config: &ChatConfig, thread_id: &str, overrides: SettingsOverrides) -> Result<()> {
    let client = graph_client(config)?;
    let settings = overrides.apply(config.agent_settings());

    client
        .update_settings(thread_id, &config.server.assistant_id, &settings)
        .await?;

    info!(thread_id, "Agent settings pushed");
    println!("{}", "✓ Settings saved successfully".green().bold());
    println!("  Model: {}", settings.model);
    println!("  Max search results: {}", settings.max_search_results);
    println!("  Debug mode: {}", settings.debug_mode);
    println!("  Log level: {}", settings.log_level);
    Ok(())
}

#[derive(Tabled)]
struct ThreadRow {
    #[tabled(rename = "Thread")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&ThreadSummary> for ThreadRow {
    fn from(thread: &ThreadSummary) -> Self {
        let label = thread.label();
        let title = if label.chars().count() > 40 {
            format!("{}...", label.chars().take(37).collect::<String>())
        } else {
            label
        };

        Self {
            id: thread.thread_id.clone(),
            title,
            status: thread.status.clone().unwrap_or_else(|| "-".to_string()),
            updated: thread
                .updated_at
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Handle `threads`
pub async fn handle_threads(config: &ChatConfig, limit: usize) -> Result<()> {
    let client = graph_client(config)?;
    let threads = client.search_threads(&config.server.user_id, limit).await?;

    if threads.is_empty() {
        println!("{}", "No threads found".yellow());
        return Ok(());
    }

    let rows: Vec<ThreadRow> = threads.iter().map(ThreadRow::from).collect();
    let count = rows.len();
    println!("{}", Table::new(rows));
    println!("\nTotal: {} threads", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overrides_apply_only_given_fields() {
        let overrides = SettingsOverrides {
            model: Some("openai/gpt-4o".to_string()),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        let settings = overrides.apply(AgentSettings::default());

        assert_eq!(settings.model, "openai/gpt-4o");
        assert_eq!(settings.log_level, "DEBUG");
        assert_eq!(settings.system_prompt, "You are a helpful AI assistant.");
        assert_eq!(settings.max_search_results, 10);
    }

    #[test]
    fn test_thread_row_truncates_long_titles() {
        let thread: ThreadSummary = serde_json::from_value(json!({
            "thread_id": "th-1",
            "status": "interrupted",
            "values": {"messages": [{"content": "x".repeat(60)}]},
        }))
        .unwrap();

        let row = ThreadRow::from(&thread);

        assert_eq!(row.title.chars().count(), 40);
        assert!(row.title.ends_with("..."));
        assert_eq!(row.status, "interrupted");
        assert_eq!(row.updated, "Unknown");
    }
}
