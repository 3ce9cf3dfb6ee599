//! Authorization status and resumption backed by a LangGraph thread.
//!
//! These bind [`langgraph_interrupts::AuthStatus`] and
//! [`langgraph_interrupts::WorkflowResume`] to a remote thread so an
//! [`AuthorizationHandler`](langgraph_interrupts::AuthorizationHandler) can poll
//! and resume a real run.

use async_trait::async_trait;
use langgraph_interrupts::{AuthStatus, BoxError, WorkflowResume};
use serde_json::Value;
use tracing::error;

use crate::error::{ClientError, Result};
use crate::graph::{GraphClient, ThreadState};

/// Name of the graph node that performs authorization.
pub const AUTHORIZATION_TASK: &str = "authorization";

/// Decide whether authorization is complete from a thread snapshot.
///
/// No pending tasks, or no `authorization` task, means complete. A task with a
/// truthy result is complete; a task with an error fails with
/// [`ClientError::TaskFailed`]; anything else is still pending.
///
/// `null`, `false`, `0` and `""` results count as no result yet.
pub fn auth_status_from_state(state: &ThreadState) -> Result<bool> {
    let Some(task) = state.tasks.iter().find(|task| task.name == AUTHORIZATION_TASK) else {
        return Ok(true);
    };

    if task.result.as_ref().is_some_and(is_truthy) {
        return Ok(true);
    }

    match task.error.as_deref() {
        Some(error) if !error.is_empty() => Err(ClientError::TaskFailed(error.to_string())),
        _ => Ok(false),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Polls a thread's state for authorization completion.
#[derive(Debug, Clone)]
pub struct ThreadAuthStatus {
    client: GraphClient,
    thread_id: String,
}

impl ThreadAuthStatus {
    pub fn new(client: GraphClient, thread_id: impl Into<String>) -> Self {
        Self {
            client,
            thread_id: thread_id.into(),
        }
    }

    pub async fn check(&self) -> Result<bool> {
        let state = self.client.get_state(&self.thread_id).await?;
        auth_status_from_state(&state)
    }
}

#[async_trait]
impl AuthStatus for ThreadAuthStatus {
    async fn check_auth_status(&self) -> std::result::Result<bool, BoxError> {
        self.check().await.map_err(|e| {
            error!(thread_id = %self.thread_id, error = %e, "Error checking auth status");
            BoxError::from(e)
        })
    }
}

/// Resumes a paused thread with a fixed resume value.
#[derive(Debug, Clone)]
pub struct ThreadResume {
    client: GraphClient,
    thread_id: String,
    assistant_id: String,
    value: Value,
}

impl ThreadResume {
    pub fn new(client: GraphClient, thread_id: impl Into<String>, assistant_id: impl Into<String>) -> Self {
        Self {
            client,
            thread_id: thread_id.into(),
            assistant_id: assistant_id.into(),
            value: Value::Null,
        }
    }

    /// Value passed as `command.resume`; defaults to `null`.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }
}

#[async_trait]
impl WorkflowResume for ThreadResume {
    async fn resume_workflow(&self) -> std::result::Result<(), BoxError> {
        self.client
            .resume(&self.thread_id, &self.assistant_id, self.value.clone())
            .await
            .map(|_| ())
            .map_err(BoxError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(tasks: Value) -> ThreadState {
        serde_json::from_value(json!({ "values": {}, "tasks": tasks })).unwrap()
    }

    #[test]
    fn test_no_tasks_is_complete() {
        assert!(auth_status_from_state(&state(json!([]))).unwrap());
    }

    #[test]
    fn test_no_authorization_task_is_complete() {
        let state = state(json!([{"id": "t1", "name": "agent"}]));
        assert!(auth_status_from_state(&state).unwrap());
    }

    #[test]
    fn test_result_is_complete() {
        let state = state(json!([{"id": "t1", "name": "authorization", "result": {"token": "ok"}}]));
        assert!(auth_status_from_state(&state).unwrap());
    }

    #[test]
    fn test_falsy_result_is_pending() {
        for result in [json!(false), json!(0), json!(""), json!(null)] {
            let state = state(json!([{"id": "t1", "name": "authorization", "result": result}]));
            assert!(!auth_status_from_state(&state).unwrap(), "result {result}");
        }

        let state = state(json!([{"id": "t1", "name": "authorization", "result": []}]));
        assert!(auth_status_from_state(&state).unwrap());
    }

    #[test]
    fn test_falsy_result_with_error_fails() {
        let state = state(json!([{"id": "t1", "name": "authorization", "result": false, "error": "expired"}]));
        assert!(matches!(auth_status_from_state(&state), Err(ClientError::TaskFailed(_))));
    }

    #[test]
    fn test_error_fails() {
        let state = state(json!([{"id": "t1", "name": "authorization", "error": "consent denied"}]));

        let err = auth_status_from_state(&state).unwrap_err();
        assert!(matches!(&err, ClientError::TaskFailed(message) if message == "consent denied"));
        assert_eq!(err.to_string(), "consent denied");
    }

    #[test]
    fn test_pending() {
        let state = state(json!([
            {"id": "t0", "name": "agent", "result": {}},
            {"id": "t1", "name": "authorization", "error": ""},
        ]));
        assert!(!auth_status_from_state(&state).unwrap());
    }
}
