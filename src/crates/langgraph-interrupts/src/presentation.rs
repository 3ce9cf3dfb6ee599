//! Consumer contract for surfaces that present an authorization interrupt
//!
//! [`AuthorizationPrompt`] is the view model a UI renders: the interrupt message
//! with its URL turned into a link, an authorize action that runs only on
//! explicit user action, a cancel action that always resumes, and an inline
//! error. Every failure is converted into a [`FailureNotice`] and handed to a
//! [`Notifier`]; none of them escape as a panic.

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::adapter::{CancelOutcome, InterruptAdapter, TriggerOutcome};
use crate::callbacks::WorkflowResume;
use crate::error::{AuthorizationError, FailureKind, HANDLE_FAILED_MESSAGE};
use crate::types::AuthorizationInterrupt;

/// Render `interrupt.message` with the first occurrence of the raw URL
/// replaced by a markdown link to the same URL.
pub fn message_with_link(interrupt: &AuthorizationInterrupt) -> String {
    if interrupt.auth_url.is_empty() {
        return interrupt.message.clone();
    }
    interrupt.message.replacen(
        &interrupt.auth_url,
        &format!("[Authorize]({})", interrupt.auth_url),
        1,
    )
}

/// User-facing description of a failed authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub kind: FailureKind,
    pub title: String,
    pub description: String,
}

impl FailureNotice {
    pub fn from_error(err: &AuthorizationError) -> Self {
        let (title, description) = match err.kind() {
            FailureKind::InvalidUrl => (
                "Invalid Authorization URL",
                "The authorization URL is invalid or unsafe.".to_string(),
            ),
            FailureKind::Timeout => (
                "Authorization Timed Out",
                "Authorization was not completed in time. You can try again.".to_string(),
            ),
            FailureKind::Cancelled => (
                "Authorization Cancelled",
                "The authorization request was cancelled.".to_string(),
            ),
            FailureKind::Failed => ("Authorization Failed", err.to_string()),
        };
        Self {
            kind: err.kind(),
            title: title.to_string(),
            description,
        }
    }
}

/// Dismissable notification surface (toasts, status lines).
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, notice: &FailureNotice);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptState {
    #[default]
    Idle,
    Authorizing,
    Completed,
    Failed(FailureNotice),
    Cancelled,
}

/// What a surface should draw for the current prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub markdown: String,
    pub auth_url: String,
    pub error: Option<String>,
    pub can_authorize: bool,
    pub can_cancel: bool,
}

#[derive(Debug, Default)]
pub struct AuthorizationPrompt {
    interrupt: Option<AuthorizationInterrupt>,
    state: Mutex<PromptState>,
}

impl AuthorizationPrompt {
    pub fn new(interrupt: Option<AuthorizationInterrupt>) -> Self {
        Self {
            interrupt,
            state: Mutex::new(PromptState::Idle),
        }
    }

    pub fn interrupt(&self) -> Option<&AuthorizationInterrupt> {
        self.interrupt.as_ref()
    }

    pub fn state(&self) -> PromptState {
        self.state.lock().clone()
    }

    /// `None` when there is no interrupt to show.
    pub fn view(&self) -> Option<PromptView> {
        let interrupt = self.interrupt.as_ref()?;
        let state = self.state.lock();
        let finished = matches!(*state, PromptState::Completed | PromptState::Cancelled);
        Some(PromptView {
            markdown: message_with_link(interrupt),
            auth_url: interrupt.auth_url.clone(),
            error: match &*state {
                PromptState::Failed(notice) => Some(notice.description.clone()),
                _ => None,
            },
            can_authorize: !finished && *state != PromptState::Authorizing,
            can_cancel: !finished,
        })
    }

    /// Run the authorization flow in response to a user action.
    pub async fn authorize(&self, adapter: &InterruptAdapter, notifier: &dyn Notifier) -> PromptState {
        let Some(interrupt) = &self.interrupt else {
            return self.state();
        };

        {
            let mut state = self.state.lock();
            match *state {
                PromptState::Authorizing | PromptState::Completed | PromptState::Cancelled => {
                    return state.clone();
                }
                _ => *state = PromptState::Authorizing,
            }
        }

        let result = adapter.trigger(interrupt).await;

        let mut state = self.state.lock();
        if *state == PromptState::Cancelled {
            // Cancelled from the surface while the flow was running.
            return state.clone();
        }
        *state = match result {
            Ok(TriggerOutcome::Completed) => {
                info!("Authorization prompt completed");
                PromptState::Completed
            }
            Ok(TriggerOutcome::AlreadyInProgress) => {
                notifier.info("Authorization is already in progress.");
                PromptState::Idle
            }
            Err(err) => {
                let notice = FailureNotice::from_error(&err);
                warn!(kind = ?notice.kind, error = %err, "Authorization prompt failed");
                notifier.error(&notice);
                PromptState::Failed(notice)
            }
        };
        state.clone()
    }

    /// Abandon the prompt and resume the workflow without waiting for
    /// authorization. Any flow in flight is torn down.
    ///
    /// A flow that has already confirmed authorization and is resuming the
    /// workflow is left to finish; the prompt stays `Authorizing` and
    /// [`authorize`](Self::authorize) reports the outcome.
    pub async fn cancel(
        &self,
        adapter: &InterruptAdapter,
        resume: &dyn WorkflowResume,
        notifier: &dyn Notifier,
    ) -> PromptState {
        {
            let mut state = self.state.lock();
            if matches!(*state, PromptState::Completed | PromptState::Cancelled) {
                return state.clone();
            }
            match adapter.cancel() {
                CancelOutcome::Resuming => {
                    notifier.info("Authorization already confirmed, resuming workflow.");
                    return state.clone();
                }
                CancelOutcome::Cancelled => info!("Tore down in-flight authorization flow"),
                CancelOutcome::NotRunning => {}
            }
            *state = PromptState::Cancelled;
        }

        if let Err(e) = resume.resume_workflow().await {
            let err = AuthorizationError::with_cause(HANDLE_FAILED_MESSAGE, e);
            notifier.error(&FailureNotice::from_error(&err));
        }
        PromptState::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_link_replaces_first_url() {
        let interrupt = AuthorizationInterrupt::new(
            "Visit https://auth.example/x to continue (https://auth.example/x)",
            "https://auth.example/x",
        );

        assert_eq!(
            message_with_link(&interrupt),
            "Visit [Authorize](https://auth.example/x) to continue (https://auth.example/x)"
        );
    }

    #[test]
    fn test_message_without_url_is_unchanged() {
        let interrupt = AuthorizationInterrupt::new("Please sign in", "https://auth.example/x");
        assert_eq!(message_with_link(&interrupt), "Please sign in");
    }

    #[test]
    fn test_notices_are_distinct_per_kind() {
        let invalid = FailureNotice::from_error(&AuthorizationError::InvalidAuthUrl);
        let timeout = FailureNotice::from_error(&AuthorizationError::Timeout);
        let failed = FailureNotice::from_error(&AuthorizationError::failed("Failed to check authorization status"));

        assert_eq!(invalid.title, "Invalid Authorization URL");
        assert_eq!(invalid.description, "The authorization URL is invalid or unsafe.");
        assert_eq!(timeout.title, "Authorization Timed Out");
        assert_eq!(failed.title, "Authorization Failed");
        assert_eq!(failed.description, "Failed to check authorization status");
        assert_ne!(invalid.title, timeout.title);
        assert_ne!(timeout.title, failed.title);
    }

    #[test]
    fn test_no_interrupt_renders_nothing() {
        let prompt = AuthorizationPrompt::new(None);
        assert!(prompt.view().is_none());
    }

    #[test]
    fn test_idle_view() {
        let prompt = AuthorizationPrompt::new(Some(AuthorizationInterrupt::new(
            "Authorize at https://auth.example/x",
            "https://auth.example/x",
        )));

        let view = prompt.view().unwrap();
        assert_eq!(view.markdown, "Authorize at [Authorize](https://auth.example/x)");
        assert!(view.error.is_none());
        assert!(view.can_authorize);
        assert!(view.can_cancel);
    }
}
