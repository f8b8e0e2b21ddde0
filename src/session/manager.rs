//! Session lifecycle: token acquisition, restore, profile refresh
//!
//! The manager owns the derived session state and is injected into every
//! consumer; nothing here is global. Background completions (profile fetch,
//! logout notification) run as tokio tasks. Each session-mutating completion
//! carries the epoch counter captured when it was issued and is dropped if
//! the session identity changed in the meantime, so a profile fetch that
//! resolves after a logout cannot resurrect the old session.

use crate::api::client::ApiClient;
use crate::api::types::User;
use crate::error::MemovoxError;
use crate::session::credentials::CredentialStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Derived session state
///
/// `is_authenticated` tracks credential possession, not profile freshness:
/// after a restore or login the user may briefly appear logged in with no
/// `current_user` until the background profile fetch lands or purges the
/// session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub current_user: Option<User>,
    pub last_error: Option<String>,
}

/// Manages the authenticated session and its credential
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    state: Arc<RwLock<SessionState>>,
    epoch: Arc<AtomicU64>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            store,
            state: Arc::new(RwLock::new(SessionState::default())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a snapshot of the current session state
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Check if a credential is held
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    /// Get the fetched profile, if any
    pub fn current_user(&self) -> Option<User> {
        self.state.read().current_user.clone()
    }

    /// Get the last surfaced error message
    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    /// Restore the persisted session on startup
    ///
    /// A stored non-empty credential flips `is_authenticated` immediately;
    /// the profile loads in the background and an invalid token purges the
    /// session once the fetch fails. Does not block the caller.
    pub fn restore(&self) {
        match self.store.get() {
            Ok(Some(token)) => {
                self.state.write().is_authenticated = true;
                let epoch = self.bump_epoch();
                info!("restored persisted session, refreshing profile");
                self.spawn_profile_fetch(token, epoch);
            }
            Ok(None) => {
                debug!("no persisted credential");
            }
            Err(e) => {
                warn!("credential store read failed: {}", e);
            }
        }
    }

    /// Log in with an email or username
    ///
    /// Returns true only when the server accepted the credentials. Success
    /// stores the token and kicks off a best-effort profile fetch whose
    /// failure does not revert `is_authenticated` here (the fetch itself
    /// purges the session when the token turns out to be unusable).
    pub async fn login(&self, identifier: &str, password: &str) -> bool {
        match self.api.login(identifier, password).await {
            Ok(response) => {
                if let Err(e) = self.store.set(&response.token) {
                    warn!("credential persist failed: {}", e);
                }
                {
                    let mut state = self.state.write();
                    state.is_authenticated = true;
                    state.last_error = None;
                }
                let epoch = self.bump_epoch();
                info!("login succeeded");
                self.spawn_profile_fetch(response.token, epoch);
                true
            }
            Err(e) => {
                self.record_failure("login", e);
                false
            }
        }
    }

    /// Create an account; does not authenticate the session
    pub async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        activation_code: &str,
    ) -> bool {
        match self.api.register(username, email, password, activation_code).await {
            Ok(()) => {
                info!(username, "account created");
                true
            }
            Err(e) => {
                self.record_failure("registration", e);
                false
            }
        }
    }

    /// Reset a forgotten password using an activation code
    pub async fn reset_password(
        &self,
        email: &str,
        activation_code: &str,
        new_password: &str,
    ) -> bool {
        match self.api.reset_password(email, activation_code, new_password).await {
            Ok(()) => {
                info!("password reset");
                true
            }
            Err(e) => {
                self.record_failure("password reset", e);
                false
            }
        }
    }

    /// Log out
    ///
    /// The server notification is best effort and fired in the background;
    /// local teardown (credential delete, state reset) is unconditional and
    /// immediate.
    pub fn logout(&self) {
        let token = self.store.get().ok().flatten();
        self.bump_epoch();

        if let Some(token) = token {
            let api = self.api.clone();
            tokio::spawn(async move {
                if let Err(e) = api.logout(&token).await {
                    debug!("logout notification failed: {}", e);
                }
            });
        }

        if let Err(e) = self.store.delete() {
            warn!("credential delete failed: {}", e);
        }
        *self.state.write() = SessionState::default();
        info!("logged out");
    }

    /// Bump the session epoch, invalidating in-flight completions
    fn bump_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch the profile in the background
    ///
    /// Success stores the user; any failure is the 401-equivalent discovery
    /// path and purges the session, silently (nothing is written to
    /// `last_error` by the demotion). Results from a superseded epoch are
    /// dropped.
    fn spawn_profile_fetch(&self, token: String, epoch: u64) {
        let api = self.api.clone();
        let store = self.store.clone();
        let state = self.state.clone();
        let current_epoch = self.epoch.clone();

        tokio::spawn(async move {
            let result = api.me(&token).await;

            if current_epoch.load(Ordering::SeqCst) != epoch {
                debug!("dropping stale profile fetch result");
                return;
            }

            match result {
                Ok(user) => {
                    debug!(username = %user.username, "profile loaded");
                    state.write().current_user = Some(user);
                }
                Err(e) => {
                    warn!("profile fetch failed, purging session: {}", e);
                    if let Err(e) = store.delete() {
                        warn!("credential delete failed: {}", e);
                    }
                    let mut s = state.write();
                    s.is_authenticated = false;
                    s.current_user = None;
                }
            }
        });
    }

    /// Surface a failed session operation on `last_error`
    ///
    /// An opaque rejection carries no message and leaves `last_error`
    /// untouched.
    fn record_failure(&self, operation: &str, error: MemovoxError) {
        warn!("{} failed: {}", operation, error);
        match error {
            MemovoxError::ServerRejected(message) => {
                self.state.write().last_error = Some(message);
            }
            MemovoxError::NetworkFailure(_) => {
                self.state.write().last_error = Some(error.user_message());
            }
            MemovoxError::ServerRejectedOpaque(_) => {}
            other => {
                self.state.write().last_error = Some(other.user_message());
            }
        }
    }
}
