//! LangGraph server access for agent-chat.
//!
//! # Modules
//!
//! - [`client`] - HTTP transport with retry and `X-Api-Key` handling
//! - [`config`] - environment and config-file helpers
//! - [`graph`] - [`GraphClient`] and the thread data model
//! - [`status`] - authorization status and resumption backed by a thread,
//!   for use with [`langgraph_interrupts::AuthorizationHandler`]
//! - [`proxy`] - the `POST /api/proxy` forwarding service
//!
//! ```rust,ignore
//! use langgraph_client::{GraphClient, ThreadAuthStatus, ThreadResume};
//!
//! let client = GraphClient::new("http://localhost:2024", None)?;
//! let state = client.get_state(&thread_id).await?;
//! if let Some(interrupt) = state.authorization_interrupt() {
//!     let status = ThreadAuthStatus::new(client.clone(), &thread_id);
//!     let resume = ThreadResume::new(client.clone(), &thread_id, "graph");
//!     // hand both to HandlerCallbacks::new(...)
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod proxy;
pub mod status;

pub use client::{AuthHelper, ClientConfig, HttpClient, API_KEY_ENV, API_KEY_HEADER};
pub use error::{ClientError, Result};
pub use graph::{AgentSettings, GraphClient, TaskInterrupt, ThreadState, ThreadSummary, ThreadTask};
pub use proxy::{proxy_router, ProxyConfig, ProxyRequest, ProxyState};
pub use status::{auth_status_from_state, ThreadAuthStatus, ThreadResume, AUTHORIZATION_TASK};
