//! `interrupt` command: resolve a thread's authorization interrupt from the terminal

use colored::Colorize;
use langgraph_client::{ThreadAuthStatus, ThreadResume};
use langgraph_interrupts::{
    https_only, AuthorizationPrompt, BoxError, CancelSignal, HandlerCallbacks,
    InterruptAdapter, Notifier, PromptState, WorkflowResume,
};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::cli::graph_client;
use crate::cli::server::ensure_reachable;
use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::terminal::{self, TerminalNotifier};

/// Handle `interrupt --thread <id>`
pub async fn handle_interrupt(config: &ChatConfig, thread_id: &str) -> Result<()> {
    let client = graph_client(config)?;
    ensure_reachable(&client).await?;

    let state = client.get_state(thread_id).await?;
    let interrupt = state
        .authorization_interrupt()
        .ok_or_else(|| ChatError::NoInterrupt(thread_id.to_string()))?;
    info!(thread_id, auth_url = %interrupt.auth_url, "Found authorization interrupt");

    let resume = Arc::new(ThreadResume::new(
        client.clone(),
        thread_id,
        &config.server.assistant_id,
    ));
    let opener: fn(&str) -> std::result::Result<(), BoxError> = if config.authorization.open_browser {
        terminal::open_url
    } else {
        terminal::print_url
    };
    let callbacks = HandlerCallbacks::from_parts(
        Arc::new(terminal::display),
        resume.clone(),
        Arc::new(ThreadAuthStatus::new(client, thread_id)),
    )
    .with_validator(https_only)
    .with_opener(opener);

    let adapter = InterruptAdapter::new(config.authorization.handler, callbacks);
    let prompt = AuthorizationPrompt::new(Some(interrupt));

    let stop = CancelSignal::new();
    let ctrl_c = {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.cancel();
            }
        })
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = run_prompt(&prompt, &adapter, resume.as_ref(), &TerminalNotifier, stdin, &stop).await;
    ctrl_c.abort();

    match outcome? {
        PromptState::Completed | PromptState::Cancelled => Ok(()),
        PromptState::Failed(notice) => Err(ChatError::AuthorizationIncomplete(notice.title)),
        PromptState::Idle | PromptState::Authorizing => {
            Err(ChatError::AuthorizationIncomplete("prompt closed".to_string()))
        }
    }
}

/// Drive `prompt` from line-oriented user input until it is completed,
/// cancelled, the input ends, or `stop` fires.
///
/// `a` runs the authorization flow and `c` cancels it and resumes the thread.
/// Firing `stop` during a flow tears the flow down unless it is already
/// resuming the workflow, in which case the flow is left to finish.
pub async fn run_prompt<R>(
    prompt: &AuthorizationPrompt,
    adapter: &InterruptAdapter,
    resume: &dyn WorkflowResume,
    notifier: &dyn Notifier,
    input: R,
    stop: &CancelSignal,
) -> Result<PromptState>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        match prompt.state() {
            PromptState::Completed => {
                println!("{}", "✓ Authorization complete, workflow resumed".green().bold());
                return Ok(PromptState::Completed);
            }
            PromptState::Cancelled => {
                println!("{}", "Authorization cancelled, workflow resumed".yellow());
                return Ok(PromptState::Cancelled);
            }
            _ => terminal::show(prompt),
        }

        let line = tokio::select! {
            biased;
            _ = stop.cancelled() => return Ok(prompt.state()),
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("Input closed");
            return Ok(prompt.state());
        };

        match line.trim().to_lowercase().as_str() {
            "a" | "authorize" => {
                let authorize = prompt.authorize(adapter, notifier);
                tokio::pin!(authorize);
                tokio::select! {
                    _ = &mut authorize => {}
                    _ = stop.cancelled() => {
                        adapter.cancel();
                        authorize.await;
                        return Ok(prompt.state());
                    }
                }
            }
            "c" | "cancel" => {
                prompt.cancel(adapter, resume, notifier).await;
            }
            "" => {}
            other => notifier.info(&format!("Unknown action '{}', use 'a' or 'c'", other)),
        }
    }
}

