//! Injected session collaborators: bearer tokens and the current user.
//!
//! Both are consulted on every request and never cached by the client, so a
//! login or logout between requests takes effect immediately.

use std::sync::{Arc, PoisonError, RwLock};

/// Attribution used when no user is signed in.
pub const FALLBACK_USER: &str = "system";

/// Pluggable bearer token provider, consulted before every request.
///
/// Returning `None` sends the request without an `Authorization` header;
/// the server decides whether that is acceptable.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    /// The current bearer token, if any.
    async fn token(&self) -> Option<String>;
}

/// No authentication: anonymous requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Option<String> {
        None
    }
}

/// A bearer token obtained externally that never changes.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Resolves the user a write is attributed to.
pub trait IdentityProvider: Send + Sync + 'static {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<String>;
}

/// A fixed identity.
#[derive(Debug, Clone)]
pub struct StaticIdentity(String);

impl StaticIdentity {
    /// Wraps a user name.
    pub fn new(user: impl Into<String>) -> Self {
        Self(user.into())
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No signed-in user; writes are attributed to [`FALLBACK_USER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<String> {
        None
    }
}

/// A mutable session holding both the token and the user.
///
/// Stands in for the browser's session storage: the application signs in
/// and out on a shared handle, and the client reads the latest values on
/// each request.
///
/// # Example
///
/// ```
/// use hourly_rates::client::{IdentityProvider, Session, TokenSource};
///
/// # #[tokio::main]
/// # async fn main() {
/// let session = Session::new();
/// assert_eq!(session.token().await, None);
///
/// session.sign_in("jwt-abc", "hr.admin");
/// assert_eq!(session.token().await.as_deref(), Some("jwt-abc"));
/// assert_eq!(session.current_user().as_deref(), Some("hr.admin"));
///
/// session.sign_out();
/// assert_eq!(session.current_user(), None);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<String>,
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a token and user.
    pub fn sign_in(&self, token: impl Into<String>, user: impl Into<String>) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(token.into());
        state.user = Some(user.into());
    }

    /// Clears the token and user.
    pub fn sign_out(&self) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.token = None;
        state.user = None;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl TokenSource for Session {
    async fn token(&self) -> Option<String> {
        self.read().token.clone()
    }
}

impl IdentityProvider for Session {
    fn current_user(&self) -> Option<String> {
        self.read().user.clone()
    }
}
