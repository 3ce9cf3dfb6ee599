//! Cancellation of in-flight authorization flows

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info};

const ACTIVE: u8 = 0;
const CANCELLED: u8 = 1;
const COMMITTED: u8 = 2;

/// Signal used to abandon a pending authorization.
///
/// Clones share state: cancelling any clone cancels all of them. A flow that
/// reaches a step which cannot be undone calls [`commit`](Self::commit); from
/// then on cancellation is refused. Cancelled and committed are both final.
#[derive(Clone)]
pub struct CancelSignal {
    state: Arc<AtomicU8>,
    notify: Arc<Notify>,
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .field("committed", &self.is_committed())
            .finish()
    }
}

impl CancelSignal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ACTIVE)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Request cancellation. Idempotent, and a no-op once committed.
    pub fn cancel(&self) {
        if self
            .state
            .compare_exchange(ACTIVE, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Authorization flow cancelled");
            self.notify.notify_waiters();
        }
    }

    /// Pass the point of no return. Returns `false` if cancellation won the race.
    pub fn commit(&self) -> bool {
        match self
            .state
            .compare_exchange(ACTIVE, COMMITTED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                debug!("Authorization flow committed");
                true
            }
            Err(current) => current == COMMITTED,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == CANCELLED
    }

    pub fn is_committed(&self) -> bool {
        self.state.load(Ordering::SeqCst) == COMMITTED
    }

    /// Resolve once cancellation has been requested. Never resolves after a commit.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel is not missed.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
