//! Auth façade for the presentation layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages and commands read session flags and start sign-in through this
//! type rather than poking the session store directly. Both entry points
//! swallow their failures: a failed callback exchange is a `false`, not an
//! error.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::api::ApiClient;
use crate::net::transport::ApiRequest;
use crate::net::types::{TokenResponse, User};
use crate::state::session::{SessionHandle, SessionPhase, SessionStore};

/// Unauthenticated endpoint exchanging an OAuth code for a bearer token.
pub const AUTH_CALLBACK_PATH: &str = "/auth/google/callback";

#[derive(Clone)]
pub struct Auth {
    store: SessionStore,
}

impl Auth {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    fn handle(&self) -> &SessionHandle {
        self.store.handle()
    }

    fn api(&self) -> &ApiClient {
        self.store.api()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.handle().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.handle().is_admin()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.handle().user()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.handle().loading()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.handle().last_error()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.handle().phase()
    }

    /// Restore a persisted session. Skipped when already authenticated so
    /// repeated calls from several pages do not re-fetch the profile.
    pub async fn init_auth(&self) {
        if self.is_authenticated() {
            return;
        }
        self.store.bootstrap().await;
    }

    /// Exchange an OAuth authorization `code` for a token, then load the
    /// profile. Returns whether a token was obtained.
    pub async fn handle_auth_callback(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            tracing::warn!("auth callback without code");
            return false;
        }

        let request = ApiRequest::get(AUTH_CALLBACK_PATH).with_query("code", code);
        let token = match self.api().request_public_json::<TokenResponse>(request).await {
            Ok(TokenResponse { token: Some(token) }) if !token.is_empty() => token,
            Ok(_) => {
                tracing::error!("auth callback response carried no token");
                return false;
            }
            Err(err) => {
                tracing::error!(error = %err, code = err.error_code(), "auth callback exchange failed");
                return false;
            }
        };

        self.store.set_token(&token);
        self.store.fetch_profile().await;
        tracing::info!(admin = self.is_admin(), "signed in");
        true
    }

    pub fn logout(&self) {
        self.store.logout();
    }
}
