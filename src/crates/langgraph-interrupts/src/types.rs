//! Interrupt data model
//!
//! An authorization interrupt is emitted by a paused graph run when the end user
//! must complete an out-of-band consent step before execution can continue. On the
//! wire it is a JSON object:
//!
//! ```json
//! {"message": "Please authorize at https://auth.example/x", "auth_url": "https://auth.example/x", "type": "authorization"}
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Discriminant of an interrupt payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterruptKind {
    #[default]
    Authorization,
}

/// Authorization interrupt received from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationInterrupt {
    /// Text shown to the user, may embed the authorization URL.
    pub message: String,

    /// URL the user must visit to complete authorization.
    pub auth_url: String,

    /// Always [`InterruptKind::Authorization`].
    #[serde(rename = "type")]
    pub kind: InterruptKind,
}

impl AuthorizationInterrupt {
    pub fn new(message: impl Into<String>, auth_url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            auth_url: auth_url.into(),
            kind: InterruptKind::Authorization,
        }
    }

    /// Parse an interrupt value, returning `None` when it is not an
    /// authorization interrupt.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Serialize to the wire shape.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "message": self.message,
            "auth_url": self.auth_url,
            "type": self.kind,
        })
    }
}

/// Capability to handle authorization interrupts.
///
/// Resolves once authorization has been confirmed and the paused workflow has
/// been resumed.
#[async_trait]
pub trait InterruptHandler: Send + Sync {
    async fn handle_authorization_interrupt(&self, interrupt: &AuthorizationInterrupt) -> Result<()>;
}
