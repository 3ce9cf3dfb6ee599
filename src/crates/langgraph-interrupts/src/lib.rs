//! # langgraph-interrupts
//!
//! Authorization interrupt handling for clients of a LangGraph execution
//! service.
//!
//! When a remote run pauses because the end user must complete an out-of-band
//! authorization step (an OAuth-style consent redirect), the client has to show
//! the request, send the user to the authorization URL, wait for completion and
//! then resume the paused run. This crate implements that flow as a small state
//! machine with a bounded polling loop, explicit cancellation and a typed
//! failure taxonomy.
//!
//! ## Modules
//!
//! - [`types`] - the [`AuthorizationInterrupt`] wire shape and the
//!   [`InterruptHandler`] capability
//! - [`error`] - [`AuthorizationError`] and [`FailureKind`]
//! - [`config`] - [`HandlerConfig`] timing knobs
//! - [`callbacks`] - caller-supplied bindings ([`HandlerCallbacks`])
//! - [`cancel`] - [`CancelSignal`] for abandoning a pending flow
//! - [`handler`] - the [`AuthorizationHandler`] state machine
//! - [`adapter`] - [`InterruptAdapter`], the per-environment binding layer
//! - [`presentation`] - [`AuthorizationPrompt`], the consumer contract for UIs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use langgraph_interrupts::{
//!     AuthorizationInterrupt, BoxError, HandlerCallbacks, HandlerConfig, InterruptAdapter,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let callbacks = HandlerCallbacks::new(
//!     |message: &str| println!("{message}"),
//!     || async { Ok::<(), BoxError>(()) },
//!     || async { Ok::<bool, BoxError>(true) },
//! )
//! .with_validator(langgraph_interrupts::https_only);
//!
//! let adapter = InterruptAdapter::new(HandlerConfig::default(), callbacks);
//! let interrupt = AuthorizationInterrupt::new(
//!     "Please authorize at https://auth.example/x",
//!     "https://auth.example/x",
//! );
//! adapter.trigger(&interrupt).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod callbacks;
pub mod cancel;
pub mod config;
pub mod error;
pub mod handler;
pub mod presentation;
pub mod types;

pub use adapter::{CancelOutcome, InterruptAdapter, TriggerOutcome};
pub use callbacks::{
    https_only, open_in_browser, AuthStatus, DisplayFn, HandlerCallbacks, OpenFn, ValidateFn,
    WorkflowResume,
};
pub use cancel::CancelSignal;
pub use config::HandlerConfig;
pub use error::{AuthorizationError, BoxError, FailureKind, Result};
pub use handler::AuthorizationHandler;
pub use presentation::{
    message_with_link, AuthorizationPrompt, FailureNotice, Notifier, PromptState, PromptView,
};
pub use types::{AuthorizationInterrupt, InterruptHandler, InterruptKind};
