//! Authorization interrupt handler
//!
//! [`AuthorizationHandler`] drives one authorization interrupt from receipt to
//! workflow resumption. Each call runs the same steps in strict order:
//!
//! ```text
//! validate ──► notify ──► open URL ──► poll status ──► resume
//!    │                                   │   │   │
//!    └─ InvalidAuthUrl        Timeout ◄──┘   │   └──► Cancelled
//!                                            └──► Failed (status check error)
//! ```
//!
//! # Polling
//!
//! The deadline is tested before every status check, so a zero timeout fails
//! with [`AuthorizationError::Timeout`] without calling the predicate. A
//! predicate error fails the run immediately and is never retried. A zero poll
//! interval is legal and yields to the scheduler between checks.
//!
//! # Example
//!
//! ```rust
//! use langgraph_interrupts::{
//!     AuthorizationHandler, AuthorizationInterrupt, BoxError, HandlerCallbacks, HandlerConfig,
//! };
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let callbacks = HandlerCallbacks::new(
//!     |message: &str| println!("{message}"),
//!     || async { Ok::<(), BoxError>(()) },
//!     || async { Ok::<bool, BoxError>(true) },
//! )
//! .with_opener(|_url: &str| Ok(()));
//!
//! let handler = AuthorizationHandler::new(
//!     HandlerConfig::new().with_poll_interval(Duration::from_millis(10)),
//!     callbacks,
//! );
//!
//! let interrupt = AuthorizationInterrupt::new("Please authorize", "https://auth.example/x");
//! handler.handle_authorization_interrupt(&interrupt).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::callbacks::{open_in_browser, HandlerCallbacks};
use crate::cancel::CancelSignal;
use crate::config::HandlerConfig;
use crate::error::{AuthorizationError, Result, HANDLE_FAILED_MESSAGE, STATUS_CHECK_FAILED_MESSAGE};
use crate::types::{AuthorizationInterrupt, InterruptHandler};

/// Stateless authorization interrupt handler.
///
/// Holds nothing but its configuration and callbacks, so concurrent calls are
/// independent runs of the state machine.
#[derive(Debug, Clone)]
pub struct AuthorizationHandler {
    config: HandlerConfig,
    callbacks: HandlerCallbacks,
}

impl AuthorizationHandler {
    pub fn new(config: HandlerConfig, callbacks: HandlerCallbacks) -> Self {
        Self { config, callbacks }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn callbacks(&self) -> &HandlerCallbacks {
        &self.callbacks
    }

    /// Handle `interrupt` with no way to cancel it other than dropping the future.
    pub async fn handle_authorization_interrupt(&self, interrupt: &AuthorizationInterrupt) -> Result<()> {
        self.handle_with_cancel(interrupt, &CancelSignal::new()).await
    }

    /// Handle `interrupt`, abandoning the flow with
    /// [`AuthorizationError::Cancelled`] once `cancel` fires.
    pub async fn handle_with_cancel(
        &self,
        interrupt: &AuthorizationInterrupt,
        cancel: &CancelSignal,
    ) -> Result<()> {
        if let Some(validate) = &self.callbacks.validate {
            if !validate(&interrupt.auth_url) {
                warn!(auth_url = %interrupt.auth_url, "Rejected authorization URL");
                return Err(AuthorizationError::InvalidAuthUrl);
            }
        }

        self.run(interrupt, cancel).await
    }

    async fn run(&self, interrupt: &AuthorizationInterrupt, cancel: &CancelSignal) -> Result<()> {
        (self.callbacks.display)(&interrupt.message);

        info!(auth_url = %interrupt.auth_url, "Opening authorization URL");
        let opened = match &self.callbacks.open {
            Some(open) => open(&interrupt.auth_url),
            None => open_in_browser(&interrupt.auth_url),
        };
        opened.map_err(|e| AuthorizationError::with_cause(HANDLE_FAILED_MESSAGE, e))?;

        self.wait_for_completion(cancel).await?;

        // Past this point the resume runs to completion even if cancel fires.
        if !cancel.commit() {
            return Err(AuthorizationError::Cancelled);
        }

        info!("Authorization confirmed, resuming workflow");
        self.callbacks
            .resume
            .resume_workflow()
            .await
            .map_err(|e| AuthorizationError::with_cause(HANDLE_FAILED_MESSAGE, e))
    }

    async fn wait_for_completion(&self, cancel: &CancelSignal) -> Result<()> {
        let start = Instant::now();
        let mut attempt: u64 = 0;

        while start.elapsed() < self.config.timeout {
            if cancel.is_cancelled() {
                return Err(AuthorizationError::Cancelled);
            }

            attempt += 1;
            let checked = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AuthorizationError::Cancelled),
                checked = self.callbacks.status.check_auth_status() => checked,
            };

            match checked {
                Ok(true) => {
                    debug!(attempt, elapsed_ms = start.elapsed().as_millis() as u64, "Authorization complete");
                    return Ok(());
                }
                Ok(false) => {
                    debug!(attempt, "Authorization still pending");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Authorization status check failed");
                    return Err(AuthorizationError::with_cause(STATUS_CHECK_FAILED_MESSAGE, e));
                }
            }

            self.pause(cancel).await?;
        }

        warn!(
            attempts = attempt,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "Authorization timed out"
        );
        Err(AuthorizationError::Timeout)
    }

    async fn pause(&self, cancel: &CancelSignal) -> Result<()> {
        if self.config.poll_interval == Duration::ZERO {
            tokio::task::yield_now().await;
            return Ok(());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AuthorizationError::Cancelled),
            _ = tokio::time::sleep(self.config.poll_interval) => Ok(()),
        }
    }
}

#[async_trait]
impl InterruptHandler for AuthorizationHandler {
    async fn handle_authorization_interrupt(&self, interrupt: &AuthorizationInterrupt) -> Result<()> {
        AuthorizationHandler::handle_authorization_interrupt(self, interrupt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn interrupt() -> AuthorizationInterrupt {
        AuthorizationInterrupt::new("Please authorize at URL", "https://auth.example/x")
    }

    fn counting_callbacks(status: impl Fn(usize) -> std::result::Result<bool, String> + Send + Sync + 'static)
        -> (HandlerCallbacks, Arc<AtomicUsize>, Arc<AtomicUsize>)
    {
        let checks = Arc::new(AtomicUsize::new(0));
        let resumes = Arc::new(AtomicUsize::new(0));

        let check_counter = checks.clone();
        let resume_counter = resumes.clone();
        let callbacks = HandlerCallbacks::new(
            |_: &str| {},
            move || {
                let resume_counter = resume_counter.clone();
                async move {
                    resume_counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), BoxError>(())
                }
            },
            move || {
                let n = check_counter.fetch_add(1, Ordering::SeqCst) + 1;
                let result = status(n).map_err(BoxError::from);
                async move { result }
            },
        )
        .with_opener(|_: &str| Ok(()));

        (callbacks, checks, resumes)
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_when_status_completes() {
        let (callbacks, checks, resumes) = counting_callbacks(|n| Ok(n >= 3));
        let handler = AuthorizationHandler::new(
            HandlerConfig::new().with_poll_interval(Duration::from_millis(100)),
            callbacks,
        );

        handler.handle_authorization_interrupt(&interrupt()).await.unwrap();

        assert_eq!(checks.load(Ordering::SeqCst), 3);
        assert_eq!(resumes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_opener_failure_is_wrapped() {
        let (callbacks, checks, resumes) = counting_callbacks(|_| Ok(true));
        let callbacks = callbacks.with_opener(|_: &str| Err("no browser".into()));
        let handler = AuthorizationHandler::new(HandlerConfig::default(), callbacks);

        let err = handler.handle_authorization_interrupt(&interrupt()).await.unwrap_err();

        assert_eq!(err.to_string(), HANDLE_FAILED_MESSAGE);
        assert_eq!(err.cause().unwrap().to_string(), "no browser");
        assert_eq!(checks.load(Ordering::SeqCst), 0);
        assert_eq!(resumes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_failure_is_wrapped() {
        let callbacks = HandlerCallbacks::new(
            |_: &str| {},
            || async { Err::<(), BoxError>("run not found".into()) },
            || async { Ok::<bool, BoxError>(true) },
        )
        .with_opener(|_: &str| Ok(()));
        let handler = AuthorizationHandler::new(HandlerConfig::default(), callbacks);

        let err = handler.handle_authorization_interrupt(&interrupt()).await.unwrap_err();

        assert_eq!(err.kind(), crate::FailureKind::Failed);
        assert_eq!(err.cause().unwrap().to_string(), "run not found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_poll_stops_loop() {
        let (callbacks, checks, resumes) = counting_callbacks(|_| Ok(false));
        let handler = AuthorizationHandler::new(
            HandlerConfig::new().with_poll_interval(Duration::from_secs(2)),
            callbacks,
        );
        let cancel = CancelSignal::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            canceller.cancel();
        });

        let err = handler.handle_with_cancel(&interrupt(), &cancel).await.unwrap_err();

        assert!(err.is_cancelled());
        // Checks at 0s, 2s, 4s; the cancel at 5s interrupts the next sleep.
        assert_eq!(checks.load(Ordering::SeqCst), 3);
        assert_eq!(resumes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_resume_is_ignored() {
        let resumes = Arc::new(AtomicUsize::new(0));
        let resume_counter = resumes.clone();
        let callbacks = HandlerCallbacks::new(
            |_: &str| {},
            move || {
                let resume_counter = resume_counter.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    resume_counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), BoxError>(())
                }
            },
            || async { Ok::<bool, BoxError>(true) },
        )
        .with_opener(|_: &str| Ok(()));
        let handler = AuthorizationHandler::new(HandlerConfig::default(), callbacks);
        let cancel = CancelSignal::new();

        let intr = interrupt();
        let (result, _) = tokio::join!(handler.handle_with_cancel(&intr, &cancel), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        });

        result.unwrap();
        assert!(cancel.is_committed());
        assert_eq!(resumes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_signal_never_checks() {
        let (callbacks, checks, resumes) = counting_callbacks(|_| Ok(true));
        let handler = AuthorizationHandler::new(HandlerConfig::default(), callbacks);
        let cancel = CancelSignal::new();
        cancel.cancel();

        let err = handler.handle_with_cancel(&interrupt(), &cancel).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(checks.load(Ordering::SeqCst), 0);
        assert_eq!(resumes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_poll_interval_busy_polls() {
        let (callbacks, checks, resumes) = counting_callbacks(|n| Ok(n == 25));
        let handler = AuthorizationHandler::new(
            HandlerConfig::new().with_poll_interval(Duration::ZERO),
            callbacks,
        );

        handler.handle_authorization_interrupt(&interrupt()).await.unwrap();

        assert_eq!(checks.load(Ordering::SeqCst), 25);
        assert_eq!(resumes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trait_object_dispatch() {
        let (callbacks, _, resumes) = counting_callbacks(|_| Ok(true));
        let handler: Arc<dyn InterruptHandler> =
            Arc::new(AuthorizationHandler::new(HandlerConfig::default(), callbacks));

        handler.handle_authorization_interrupt(&interrupt()).await.unwrap();
        assert_eq!(resumes.load(Ordering::SeqCst), 1);
    }
}
