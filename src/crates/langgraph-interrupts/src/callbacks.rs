//! Caller-supplied bindings used by the authorization handler
//!
//! The handler never talks to a UI or to the remote service directly. It is
//! handed a [`HandlerCallbacks`] value carrying:
//!
//! - `display` - notify the user with the interrupt message
//! - `resume` - resume the paused run once authorization is confirmed
//! - `status` - report whether authorization has completed (may fail)
//! - `validate` - optional URL check, no validation when absent
//! - `open` - optional URL opener, defaults to launching the system browser
//!
//! `status` is an abstract capability: a polling client and a push-based
//! notification channel can both implement [`AuthStatus`].

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::error::BoxError;

/// Reports whether the out-of-band authorization step has completed.
#[async_trait]
pub trait AuthStatus: Send + Sync {
    async fn check_auth_status(&self) -> Result<bool, BoxError>;
}

/// Resumes the paused workflow.
#[async_trait]
pub trait WorkflowResume: Send + Sync {
    async fn resume_workflow(&self) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> AuthStatus for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, BoxError>> + Send + 'static,
{
    async fn check_auth_status(&self) -> Result<bool, BoxError> {
        (self)().await
    }
}

#[async_trait]
impl<F, Fut> WorkflowResume for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn resume_workflow(&self) -> Result<(), BoxError> {
        (self)().await
    }
}

pub type DisplayFn = Arc<dyn Fn(&str) + Send + Sync>;
pub type ValidateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;
pub type OpenFn = Arc<dyn Fn(&str) -> Result<(), BoxError> + Send + Sync>;

/// Set of callbacks one handler instance is bound to.
#[derive(Clone)]
pub struct HandlerCallbacks {
    pub display: DisplayFn,
    pub resume: Arc<dyn WorkflowResume>,
    pub status: Arc<dyn AuthStatus>,
    pub validate: Option<ValidateFn>,
    pub open: Option<OpenFn>,
}

impl HandlerCallbacks {
    pub fn new(
        display: impl Fn(&str) + Send + Sync + 'static,
        resume: impl WorkflowResume + 'static,
        status: impl AuthStatus + 'static,
    ) -> Self {
        Self::from_parts(Arc::new(display), Arc::new(resume), Arc::new(status))
    }

    /// Build from shared bindings, keeping their identity for
    /// [`same_bindings`](Self::same_bindings).
    pub fn from_parts(
        display: DisplayFn,
        resume: Arc<dyn WorkflowResume>,
        status: Arc<dyn AuthStatus>,
    ) -> Self {
        Self {
            display,
            resume,
            status,
            validate: None,
            open: None,
        }
    }

    pub fn with_validator(mut self, validate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Some(Arc::new(validate));
        self
    }

    pub fn with_shared_validator(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn with_opener(
        mut self,
        open: impl Fn(&str) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.open = Some(Arc::new(open));
        self
    }

    pub fn with_shared_opener(mut self, open: OpenFn) -> Self {
        self.open = Some(open);
        self
    }

    /// True when every binding is the same allocation in both sets.
    pub fn same_bindings(&self, other: &Self) -> bool {
        same_arc(&self.display, &other.display)
            && same_arc(&self.resume, &other.resume)
            && same_arc(&self.status, &other.status)
            && same_optional(&self.validate, &other.validate)
            && same_optional(&self.open, &other.open)
    }
}

impl std::fmt::Debug for HandlerCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerCallbacks")
            .field("validate", &self.validate.is_some())
            .field("open", &self.open.is_some())
            .finish_non_exhaustive()
    }
}

fn same_arc<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a) as *const u8 == Arc::as_ptr(b) as *const u8
}

fn same_optional<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_arc(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Open `url` in the platform browser.
pub fn open_in_browser(url: &str) -> Result<(), BoxError> {
    debug!(url = %url, "Launching browser");

    #[cfg(target_os = "macos")]
    std::process::Command::new("open").arg(url).spawn()?;

    #[cfg(target_os = "windows")]
    std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn()?;

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    std::process::Command::new("xdg-open").arg(url).spawn()?;

    Ok(())
}

/// Accept only absolute `https` URLs with a host and no embedded credentials.
///
/// Input the URL parser would silently rewrite (backslashes, whitespace,
/// control characters, extra slashes before the host) is rejected, so the
/// URL that gets opened is the one the user was shown.
pub fn https_only(url: &str) -> bool {
    if url.chars().any(|c| c == '\\' || c.is_whitespace() || c.is_control()) {
        return false;
    }
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(url = %url, error = %e, "Unparseable authorization URL");
            return false;
        }
    };
    let authority_follows = url
        .get(parsed.scheme().len()..)
        .is_some_and(|rest| rest.starts_with("://") && !rest.starts_with(":///"));

    parsed.scheme() == "https"
        && authority_follows
        && parsed.host_str().is_some_and(|host| !host.is_empty())
        && parsed.username().is_empty()
        && parsed.password().is_none()
}
