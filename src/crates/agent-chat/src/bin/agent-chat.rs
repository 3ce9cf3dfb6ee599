//! agent-chat CLI
//!
//! Main entry point for the agent-chat command-line tool.

use agent_chat::cli::server::SettingsOverrides;
use agent_chat::cli::{interrupt, proxy, server};
use agent_chat::{logging, ChatConfig, ConfigLoader};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "agent-chat")]
#[command(about = "Terminal client for LangGraph agents", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// LangGraph deployment URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Assistant (graph) id
    #[arg(long, global = true)]
    assistant_id: Option<String>,

    /// User id that owns threads and settings
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// LangSmith API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the LangGraph server is reachable
    Check,

    /// Resolve a thread's pending authorization interrupt
    Interrupt {
        /// Thread id
        #[arg(short, long)]
        thread: String,
        /// Status poll interval in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,
        /// Give up waiting for authorization after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print the authorization URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Push agent settings to a thread
    Settings {
        /// Thread id
        #[arg(short, long)]
        thread: String,
        #[arg(long)]
        system_prompt: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        max_search_results: Option<u32>,
        #[arg(long)]
        debug_mode: Option<bool>,
        /// DEBUG, INFO, WARN or ERROR
        #[arg(long)]
        log_level: Option<String>,
    },

    /// List the user's threads, most recently updated first
    Threads {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Run the browser request proxy
    Proxy {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut ChatConfig) {
        if let Some(api_url) = &self.api_url {
            config.server.api_url = api_url.clone();
        }
        if let Some(assistant_id) = &self.assistant_id {
            config.server.assistant_id = assistant_id.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.server.user_id = user_id.clone();
        }
        if let Some(api_key) = self.api_key.as_ref().filter(|key| !key.is_empty()) {
            config.server.api_key = Some(api_key.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new().load()?;
    cli.apply_overrides(&mut config);
    logging::init(&config.logging.level, cli.verbose);

    match cli.command {
        Commands::Check => server::handle_check(&config).await?,
        Commands::Interrupt {
            thread,
            poll_interval_ms,
            timeout_ms,
            no_browser,
        } => {
            if let Some(ms) = poll_interval_ms {
                config.authorization.handler.poll_interval = Duration::from_millis(ms);
            }
            if let Some(ms) = timeout_ms {
                config.authorization.handler.timeout = Duration::from_millis(ms);
            }
            if no_browser {
                config.authorization.open_browser = false;
            }
            interrupt::handle_interrupt(&config, &thread).await?
        }
        Commands::Settings {
            thread,
            system_prompt,
            model,
            max_search_results,
            debug_mode,
            log_level,
        } => {
            let overrides = SettingsOverrides {
                system_prompt,
                model,
                max_search_results,
                debug_mode,
                log_level,
            };
            server::handle_settings(&config, &thread, overrides).await?
        }
        Commands::Threads { limit } => server::handle_threads(&config, limit).await?,
        Commands::Proxy { host, port } => proxy::handle_proxy(&config, host, port).await?,
    }

    Ok(())
}
