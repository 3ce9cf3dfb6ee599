//! Handler timing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for authorization completion (5 minutes).
pub const DEFAULT_TIMEOUT_MS: u64 = 5 * 60 * 1000;

/// Default delay between status checks (2 seconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Timing knobs of an [`AuthorizationHandler`](crate::AuthorizationHandler).
///
/// Immutable once a handler has been built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Maximum wall-clock time to wait for completion.
    #[serde(rename = "timeout_ms", with = "millis", default = "default_timeout")]
    pub timeout: Duration,

    /// Delay between successive status checks.
    #[serde(rename = "poll_interval_ms", with = "millis", default = "default_poll_interval")]
    pub poll_interval: Duration,
}

impl HandlerConfig {
    pub fn new() -> Self {
        Self {
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Upper bound on status checks a run can make before timing out.
    pub fn max_checks(&self) -> u128 {
        if self.timeout.is_zero() {
            return 0;
        }
        match self.poll_interval.as_millis() {
            0 => u128::MAX,
            interval => self.timeout.as_millis() / interval + 1,
        }
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS)
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
