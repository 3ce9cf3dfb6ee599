//! JSON request proxy
//!
//! Browser surfaces cannot attach the server API key themselves, so they post a
//! [`ProxyRequest`] to `POST /api/proxy` and this service forwards it with the
//! key attached. Every response carries `Access-Control-Allow-Origin: *`; any
//! failure is reported as a 500 with a fixed body.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use crate::client::{AuthHelper, ClientConfig, HttpClient, API_KEY_HEADER};
use crate::config::{env_parse, env_var};
use crate::error::{ClientError, Result};

pub const PROXY_PATH: &str = "/api/proxy";

const PROXY_FAILED_MESSAGE: &str = "Failed to proxy request";

/// Body accepted by `POST /api/proxy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub api_url: String,
    pub path: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Bind address for the proxy service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `PROXY_HOST` / `PROXY_PORT`, defaulting to `127.0.0.1:3001`.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Override host and port from `PROXY_HOST` / `PROXY_PORT` when set.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(host) = env_var("PROXY_HOST") {
            self.host = host;
        }
        if let Some(port) = env_parse("PROXY_PORT")? {
            self.port = port;
        }
        Ok(self)
    }

    /// Resolve `host:port`. `host` may be a name such as `localhost`.
    pub async fn resolve(&self) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                ClientError::Config(format!("Cannot resolve {}:{}: {}", self.host, self.port, e))
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::Config(format!(
                "No addresses for {}:{}",
                self.host, self.port
            )));
        }
        Ok(addrs)
    }

    /// Bind the first resolved address that accepts.
    pub async fn bind(&self) -> Result<TcpListener> {
        let addrs = self.resolve().await?;
        Ok(TcpListener::bind(addrs.as_slice()).await?)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 3001)
    }
}

/// Shared state of the proxy handler.
#[derive(Debug, Clone)]
pub struct ProxyState {
    http: Arc<HttpClient>,
}

impl ProxyState {
    /// Forward with `api_key`, else `LANGSMITH_API_KEY`, else an empty key.
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        let key = AuthHelper::resolve_api_key(api_key).unwrap_or_default();
        let config = ClientConfig::new()
            .with_max_retries(0)
            .with_header(API_KEY_HEADER, key);
        Ok(Self {
            http: Arc::new(HttpClient::new(config)?),
        })
    }

    async fn forward(&self, request: &ProxyRequest) -> Result<Value> {
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|e| ClientError::InvalidInput(format!("Invalid method '{}': {}", request.method, e)))?;
        let url = format!("{}{}", request.api_url, request.path);

        let response = self.http.send(method, &url, request.body.as_ref()).await?;
        HttpClient::decode(response).await
    }
}

/// Router serving `POST /api/proxy` with request tracing.
pub fn proxy_router(state: ProxyState) -> Router {
    Router::new()
        .route(PROXY_PATH, post(proxy_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn proxy_handler(
    State(state): State<ProxyState>,
    payload: std::result::Result<Json<ProxyRequest>, JsonRejection>,
) -> Response {
    let result = match payload {
        Ok(Json(request)) => state.forward(&request).await,
        Err(rejection) => Err(ClientError::InvalidInput(rejection.body_text())),
    };

    match result {
        Ok(data) => ([(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(data)).into_response(),
        Err(e) => {
            error!(error = %e, "Proxy error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                Json(json!({ "error": PROXY_FAILED_MESSAGE })),
            )
                .into_response()
        }
    }
}

/// Serve the proxy until `shutdown` resolves.
pub async fn serve(
    config: &ProxyConfig,
    state: ProxyState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = config.bind().await?;
    let addr = listener.local_addr()?;
    info!(%addr, "Proxy listening on http://{}{}", addr, PROXY_PATH);

    axum::serve(listener, proxy_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Proxy stopped");
    Ok(())
}
