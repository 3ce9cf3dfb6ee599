//! Binding layer between an embedding environment and the handler
//!
//! [`InterruptAdapter`] owns the handler instance for one set of callbacks and
//! exposes a single [`trigger`](InterruptAdapter::trigger) to the presentation
//! layer. It rebuilds the handler only when the callback bindings change
//! identity, allows one flow in flight at a time, and can tear that flow down
//! through [`cancel`](InterruptAdapter::cancel).

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info};

use crate::callbacks::HandlerCallbacks;
use crate::cancel::CancelSignal;
use crate::config::HandlerConfig;
use crate::error::Result;
use crate::handler::AuthorizationHandler;
use crate::types::AuthorizationInterrupt;

/// What [`InterruptAdapter::cancel`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// No flow was in flight.
    NotRunning,
    /// The flow was torn down before it resumed the workflow.
    Cancelled,
    /// Authorization was already confirmed and the flow is resuming the
    /// workflow; it will finish on its own.
    Resuming,
}

/// Result of a successful [`InterruptAdapter::trigger`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Authorization confirmed and the workflow resumed.
    Completed,
    /// Another flow was already running; nothing was done.
    AlreadyInProgress,
}

pub struct InterruptAdapter {
    config: HandlerConfig,
    handler: RwLock<Arc<AuthorizationHandler>>,
    in_flight: Mutex<Option<CancelSignal>>,
}

impl InterruptAdapter {
    pub fn new(config: HandlerConfig, callbacks: HandlerCallbacks) -> Self {
        Self {
            config,
            handler: RwLock::new(Arc::new(AuthorizationHandler::new(config, callbacks))),
            in_flight: Mutex::new(None),
        }
    }

    /// The handler currently bound.
    pub fn handler(&self) -> Arc<AuthorizationHandler> {
        self.handler.read().clone()
    }

    /// Bind new callbacks. Returns `true` if a new handler was built.
    ///
    /// A flow already running keeps the handler it started with.
    pub fn rebind(&self, callbacks: HandlerCallbacks) -> bool {
        let mut handler = self.handler.write();
        if handler.callbacks().same_bindings(&callbacks) {
            return false;
        }
        debug!("Callback bindings changed, rebuilding authorization handler");
        *handler = Arc::new(AuthorizationHandler::new(self.config, callbacks));
        true
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Cancel the flow in flight, unless it has already started resuming.
    pub fn cancel(&self) -> CancelOutcome {
        let in_flight = self.in_flight.lock();
        let Some(signal) = in_flight.as_ref() else {
            return CancelOutcome::NotRunning;
        };
        signal.cancel();
        if signal.is_committed() {
            debug!("Flow is already resuming the workflow, not cancelled");
            CancelOutcome::Resuming
        } else {
            CancelOutcome::Cancelled
        }
    }

    /// Run the authorization flow for `interrupt`.
    ///
    /// Handler errors are returned unmodified.
    pub async fn trigger(&self, interrupt: &AuthorizationInterrupt) -> Result<TriggerOutcome> {
        let signal = {
            let mut in_flight = self.in_flight.lock();
            if in_flight.is_some() {
                info!("Authorization already in progress, ignoring trigger");
                return Ok(TriggerOutcome::AlreadyInProgress);
            }
            let signal = CancelSignal::new();
            *in_flight = Some(signal.clone());
            signal
        };
        let _guard = InFlightGuard { slot: &self.in_flight };

        let handler = self.handler();
        handler.handle_with_cancel(interrupt, &signal).await?;
        Ok(TriggerOutcome::Completed)
    }
}

impl std::fmt::Debug for InterruptAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptAdapter")
            .field("config", &self.config)
            .field("in_progress", &self.is_in_progress())
            .finish()
    }
}

/// Clears the in-flight slot when a trigger finishes or its future is dropped.
struct InFlightGuard<'a> {
    slot: &'a Mutex<Option<CancelSignal>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::time::Duration;

    fn callbacks() -> HandlerCallbacks {
        HandlerCallbacks::new(
            |_: &str| {},
            || async { Ok::<(), BoxError>(()) },
            || async { Ok::<bool, BoxError>(true) },
        )
        .with_opener(|_: &str| Ok(()))
    }

    #[test]
    fn test_rebind_same_bindings_reuses_handler() {
        let bindings = callbacks();
        let adapter = InterruptAdapter::new(HandlerConfig::default(), bindings.clone());
        let before = adapter.handler();

        assert!(!adapter.rebind(bindings));
        assert!(Arc::ptr_eq(&before, &adapter.handler()));
    }

    #[test]
    fn test_rebind_new_bindings_rebuilds_handler() {
        let adapter = InterruptAdapter::new(HandlerConfig::default(), callbacks());
        let before = adapter.handler();

        assert!(adapter.rebind(callbacks()));
        assert!(!Arc::ptr_eq(&before, &adapter.handler()));
        assert_eq!(adapter.handler().config(), &HandlerConfig::default());
    }

    #[test]
    fn test_cancel_without_flow() {
        let adapter = InterruptAdapter::new(HandlerConfig::default(), callbacks());
        assert_eq!(adapter.cancel(), CancelOutcome::NotRunning);
        assert!(!adapter.is_in_progress());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_reports_resuming_phase() {
        let resumes = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = resumes.clone();
        let callbacks = HandlerCallbacks::new(
            |_: &str| {},
            move || {
                let counter = counter.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok::<(), BoxError>(())
                }
            },
            || async { Ok::<bool, BoxError>(true) },
        )
        .with_opener(|_: &str| Ok(()));
        let adapter = InterruptAdapter::new(HandlerConfig::default(), callbacks);
        let interrupt = AuthorizationInterrupt::new("Authorize", "https://auth.example/x");

        let (outcome, cancelled) = tokio::join!(adapter.trigger(&interrupt), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            adapter.cancel()
        });

        assert_eq!(cancelled, CancelOutcome::Resuming);
        assert_eq!(outcome.unwrap(), TriggerOutcome::Completed);
        assert_eq!(resumes.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_completes_and_clears_slot() {
        let adapter = InterruptAdapter::new(
            HandlerConfig::new().with_poll_interval(Duration::from_millis(10)),
            callbacks(),
        );
        let interrupt = AuthorizationInterrupt::new("Authorize", "https://auth.example/x");

        let outcome = adapter.trigger(&interrupt).await.unwrap();

        assert_eq!(outcome, TriggerOutcome::Completed);
        assert!(!adapter.is_in_progress());
    }
}
