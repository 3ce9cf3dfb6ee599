//! HTTP transport with retry and API-key handling.
//!
//! Connect errors, timeouts and 5xx responses are retried with exponential
//! backoff. Anything else is returned to the caller on the first attempt.
//!
//! # Example
//!
//! ```rust,ignore
//! use langgraph_client::client::{ClientConfig, HttpClient};
//! use std::time::Duration;
//!
//! let config = ClientConfig::new()
//!     .with_timeout(Duration::from_secs(30))
//!     .with_max_retries(3)
//!     .with_header("X-Api-Key", "lsv2_...");
//!
//! let client = HttpClient::new(config)?;
//! let info: serde_json::Value = client.get_json("http://localhost:2024/info").await?;
//! ```

use crate::config::env_var;
use crate::error::{ClientError, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Header carrying the LangGraph / LangSmith API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "LANGSMITH_API_KEY";

/// Configuration for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration.
    pub timeout: Duration,

    /// Maximum number of retries for failed requests.
    pub max_retries: u32,

    /// Initial delay between retries.
    pub retry_delay: Duration,

    /// Backoff multiplier for retry delays.
    pub backoff_multiplier: f32,

    pub user_agent: Option<String>,

    /// Headers included in every request.
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            user_agent: Some(concat!("agent-chat/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    /// Attach `X-Api-Key` when a key resolves (see [`AuthHelper::resolve_api_key`]).
    pub fn with_api_key(self, explicit: Option<&str>) -> Self {
        match AuthHelper::resolve_api_key(explicit) {
            Some(key) => self.with_header(API_KEY_HEADER, key),
            None => self,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client with retry and default headers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ClientConfig,
    client: Client,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(Method::GET, url, None::<&()>).await?;
        Self::decode(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        Self::decode(response).await
    }

    /// Send `method url` with an optional JSON body, retrying transient failures.
    ///
    /// The response is returned whatever its status; use [`HttpClient::decode`]
    /// to turn non-success statuses into [`ClientError::Status`].
    pub async fn send<B: Serialize + ?Sized>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Response> {
        let mut req = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        self.send_with_retry(req).await
    }

    /// Decode a JSON response, mapping non-success statuses to [`ClientError::Status`].
    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_with_retry(&self, req: RequestBuilder) -> Result<Response> {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay;

        loop {
            let request = req
                .try_clone()
                .ok_or_else(|| ClientError::InvalidInput("Request body cannot be retried".to_string()))?;

            match request.send().await {
                Ok(response) => {
                    if !response.status().is_server_error() || attempts >= self.config.max_retries {
                        return Ok(response);
                    }
                    debug!(status = response.status().as_u16(), attempts, "Retrying after server error");
                }
                Err(e) => {
                    if attempts >= self.config.max_retries || !(e.is_timeout() || e.is_connect()) {
                        return Err(ClientError::Http(e));
                    }
                    debug!(error = %e, attempts, "Retrying after transport error");
                }
            }

            attempts += 1;
            tokio::time::sleep(delay).await;
            delay = Duration::from_secs_f32(delay.as_secs_f32() * self.config.backoff_multiplier);
        }
    }
}

/// Helper for API-key resolution.
pub struct AuthHelper;

impl AuthHelper {
    /// The explicit key if non-empty, else `LANGSMITH_API_KEY` if non-empty.
    pub fn resolve_api_key(explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .filter(|key| !key.is_empty())
            .or_else(|| env_var(API_KEY_ENV))
    }
}
