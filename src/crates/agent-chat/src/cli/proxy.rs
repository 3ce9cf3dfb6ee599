//! `proxy` command: serve the browser-facing request relay

use langgraph_client::proxy::{self, ProxyState};
use tracing::info;

use crate::config::ChatConfig;
use crate::error::Result;

/// Handle `proxy`. Flags beat `PROXY_HOST`/`PROXY_PORT`, which beat the config file.
pub async fn handle_proxy(config: &ChatConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut proxy_config = config.proxy.clone().with_env()?;
    if let Some(host) = host {
        proxy_config.host = host;
    }
    if let Some(port) = port {
        proxy_config.port = port;
    }

    let state = ProxyState::new(config.server.api_key.as_deref())?;
    println!(
        "Proxy listening on http://{}:{}{} (Ctrl+C to stop)",
        proxy_config.host,
        proxy_config.port,
        proxy::PROXY_PATH
    );

    proxy::serve(&proxy_config, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down proxy");
    })
    .await?;
    Ok(())
}
