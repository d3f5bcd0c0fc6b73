//! Process-wide authentication session.
//!
//! Holds the bearer token attached to every remote request and the single
//! forced-logout subscriber (normally the router) that is told when the
//! server rejects the token. Adapters share one context through an `Arc`;
//! [`SessionContext::shared`] hands out the process-wide instance.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::{info, warn};

/// Callback invoked when the server forces a logout.
pub type LogoutHandler = Arc<dyn Fn() + Send + Sync>;

static GLOBAL: LazyLock<Arc<SessionContext>> = LazyLock::new(|| Arc::new(SessionContext::new()));

/// Authentication session with an explicit `init`/`clear` lifecycle.
#[derive(Default)]
pub struct SessionContext {
    token: RwLock<Option<String>>,
    /// Set by `expire`, reset by `init` and `clear`.
    expired: AtomicBool,
    on_forced_logout: RwLock<Option<LogoutHandler>>,
}

impl SessionContext {
    /// Create an unauthenticated session with no subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide session.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Start an authenticated session.
    pub fn init(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
        self.expired.store(false, Ordering::SeqCst);
        info!("session initialised");
    }

    /// End the session (user-initiated sign-out). The subscriber is not notified.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.expired.store(false, Ordering::SeqCst);
        info!("session cleared");
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Register the forced-logout subscriber, replacing any previous one.
    pub fn on_forced_logout(&self, handler: impl Fn() + Send + Sync + 'static) {
        *self
            .on_forced_logout
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    /// React to a `401`: drop any token and notify the subscriber.
    ///
    /// Notifies whether or not a token was held. Only the first rejection
    /// after `new`, `init` or `clear` notifies, so a burst of failing
    /// requests redirects once. Returns whether the subscriber was notified.
    pub fn expire(&self) -> bool {
        self.token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if self.expired.swap(true, Ordering::SeqCst) {
            return false;
        }

        warn!("server rejected credentials, forcing logout");
        let handler = self
            .on_forced_logout
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
