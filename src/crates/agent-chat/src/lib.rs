//! # agent-chat
//!
//! Terminal client for LangGraph agent deployments. Its main job is resolving
//! authorization interrupts: when a run pauses on a tool that needs the user to
//! sign in somewhere, `agent-chat interrupt --thread <id>` shows the request,
//! opens the authorization page, polls the thread until the grant lands and
//! resumes the run.
//!
//! It also checks connectivity, pushes agent settings, lists a user's threads
//! and runs the request proxy used by browser front ends.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;

pub use config::{ChatConfig, ConfigLoader};
pub use error::{ChatError, Result};
