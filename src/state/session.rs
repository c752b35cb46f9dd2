//! Auth-session state for the current client user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The one process-wide session. The API pipeline reads the token from it on
//! every request and clears it on a 401; route guards read the derived flags;
//! resource stores check the token and admin role before calling endpoints.
//!
//! INVARIANTS
//! ==========
//! - `user` is only ever set while a token is held, and only with a profile
//!   fetched for that same token.
//! - Authenticated means a non-empty token, whether or not the profile has
//!   arrived yet.
//! - Admin means a loaded profile whose role is exactly `"admin"`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Loading, LoadingGuard};
use crate::net::api::ApiClient;
use crate::net::types::User;
use crate::storage::TokenStorage;

/// Endpoint returning the caller's profile.
pub const PROFILE_PATH: &str = "/auth/profile";
/// Recorded in `last_error` when the profile cannot be loaded.
pub const PROFILE_LOAD_FAILED: &str = "Failed to load user profile";

// =============================================================================
// SESSION
// =============================================================================

/// Where a session stands from a navigation point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Durable storage has not been consulted yet and no token is held.
    Unknown,
    Unauthenticated,
    AuthenticatedPendingProfile,
    AuthenticatedWithProfile,
}

impl SessionPhase {
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::AuthenticatedPendingProfile | Self::AuthenticatedWithProfile)
    }
}

#[derive(Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
    in_flight: u32,
    pub last_error: Option<String>,
    /// Set once durable storage has been consulted.
    pub hydrated: bool,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (self.is_authenticated(), self.user.is_some()) {
            (true, true) => SessionPhase::AuthenticatedWithProfile,
            (true, false) => SessionPhase::AuthenticatedPendingProfile,
            (false, _) if self.hydrated => SessionPhase::Unauthenticated,
            (false, _) => SessionPhase::Unknown,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("loading", &self.loading)
            .field("last_error", &self.last_error)
            .field("hydrated", &self.hydrated)
            .finish()
    }
}

impl Loading for Session {
    fn in_flight(&mut self) -> &mut u32 {
        &mut self.in_flight
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Shared access to the session plus the durable-storage capability.
///
/// Cloning is cheap and every clone sees the same session. All mutation goes
/// through the methods here; none of them can fail.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
    storage: Option<Arc<dyn TokenStorage>>,
}

impl SessionHandle {
    /// An empty session. `storage` is `None` when the environment has no
    /// durable client storage.
    #[must_use]
    pub fn new(storage: Option<Arc<dyn TokenStorage>>) -> Self {
        Self { inner: Arc::new(RwLock::new(Session::default())), storage }
    }

    #[must_use]
    pub fn has_durable_storage(&self) -> bool {
        self.storage.is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    /// Current token, if a non-empty one is held.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone().filter(|token| !token.is_empty())
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.inner.read().user.as_ref().map(|user| user.id.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.read().is_admin()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.inner.read().loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.inner.read().phase()
    }

    /// Hold `token` and persist it when durable storage exists. The profile
    /// is left alone; callers fetch it separately.
    pub fn set_token(&self, token: &str) {
        self.inner.write().token = Some(token.to_owned());
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.save(token) {
                tracing::warn!(error = %err, "failed to persist token");
            }
        }
    }

    /// Drop token and profile, in memory and in durable storage.
    pub fn clear(&self) {
        {
            let mut session = self.inner.write();
            session.token = None;
            session.user = None;
        }
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove() {
                tracing::warn!(error = %err, "failed to remove persisted token");
            }
        }
    }

    /// Read the persisted token and mark the session hydrated. Storage
    /// failures read as "no token".
    pub(crate) fn hydrate(&self) -> Option<String> {
        let persisted = match &self.storage {
            Some(storage) => match storage.load() {
                Ok(token) => token.filter(|token| !token.is_empty()),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read persisted token");
                    None
                }
            },
            None => None,
        };
        let mut session = self.inner.write();
        session.hydrated = true;
        if let Some(token) = &persisted {
            session.token = Some(token.clone());
        }
        persisted
    }

    /// Store `user` only if `token` is still the held token. Returns whether
    /// the profile was applied.
    pub(crate) fn set_user_if_current(&self, token: &str, user: User) -> bool {
        let mut session = self.inner.write();
        if session.token.as_deref() != Some(token) || token.is_empty() {
            return false;
        }
        session.user = Some(user);
        true
    }

    /// Replace the profile of the signed-in user after they were edited
    /// elsewhere. Ignored unless the ids match.
    pub(crate) fn refresh_user(&self, user: &User) {
        let mut session = self.inner.write();
        if session.user.as_ref().is_some_and(|current| current.id == user.id) {
            session.user = Some(user.clone());
        }
    }

    pub(crate) fn begin_profile_load(&self) -> LoadingGuard<Session> {
        let guard = LoadingGuard::begin(&self.inner);
        self.inner.write().last_error = None;
        guard
    }

    pub(crate) fn set_last_error(&self, message: &str) {
        self.inner.write().last_error = Some(message.to_owned());
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Token lifecycle operations over the shared session.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
}

impl SessionStore {
    /// Store operating on the session `api` attaches tokens from.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn handle(&self) -> &SessionHandle {
        self.api.session()
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Restore a persisted session: read the stored token and, if there is
    /// one, load its profile. Calling it again re-reads storage and re-fetches.
    pub async fn bootstrap(&self) {
        if self.handle().hydrate().is_none() {
            tracing::debug!("no persisted session");
            return;
        }
        tracing::debug!("restored persisted token");
        self.fetch_profile().await;
    }

    pub fn set_token(&self, token: &str) {
        self.handle().set_token(token);
    }

    /// Load the profile for the held token. Failures land in `last_error`;
    /// an auth rejection also logs the session out.
    pub async fn fetch_profile(&self) {
        let Some(token) = self.handle().token() else {
            return;
        };
        let _loading = self.handle().begin_profile_load();

        match self.api.get::<User>(PROFILE_PATH).await {
            Ok(user) => {
                if !self.handle().set_user_if_current(&token, user) {
                    tracing::debug!("session changed during profile fetch; discarding profile");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, code = err.error_code(), "profile fetch failed");
                self.handle().set_last_error(PROFILE_LOAD_FAILED);
                if err.is_auth_failure() {
                    self.logout();
                }
            }
        }
    }

    pub fn logout(&self) {
        self.handle().clear();
        tracing::info!("logged out");
    }
}
