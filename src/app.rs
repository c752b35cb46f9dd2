//! Application container.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `App` per process. It owns the single `SessionHandle` and wires every
//! store to the same `ApiClient`, so a 401 seen by any store signs out all
//! of them. Dropping the `App` is the only teardown.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, RecordingNavigator};
use crate::net::api::ApiClient;
use crate::net::transport::{ReqwestTransport, Transport};
use crate::state::cards::CardStore;
use crate::state::decks::DeckStore;
use crate::state::session::{SessionHandle, SessionStore};
use crate::state::users::UserStore;
use crate::storage::{FileTokenStorage, TokenStorage};
use crate::util::guards::{self, GuardOutcome};

#[derive(Clone)]
pub struct App {
    pub config: ClientConfig,
    pub auth: Auth,
    pub cards: CardStore,
    pub decks: DeckStore,
    pub users: UserStore,
    navigator: Arc<dyn Navigator>,
}

impl App {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Option<Arc<dyn TokenStorage>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = SessionHandle::new(storage);
        let api = ApiClient::new(transport, session, Arc::clone(&navigator));
        let store = SessionStore::new(api.clone());

        Self {
            config,
            auth: Auth::new(store),
            cards: CardStore::new(api.clone()),
            decks: DeckStore::new(api.clone()),
            users: UserStore::new(api),
            navigator,
        }
    }

    /// Production wiring: reqwest transport, file-backed token storage when
    /// configured, and a navigator that records redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig, navigator: Arc<RecordingNavigator>) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config.api_base_url, config.timeouts)?;
        let storage = config
            .token_file
            .as_ref()
            .map(|path| Arc::new(FileTokenStorage::new(path)) as Arc<dyn TokenStorage>);

        tracing::debug!(
            base_url = %config.api_base_url,
            durable = storage.is_some(),
            "client configured"
        );
        Ok(Self::new(config, Arc::new(transport), storage, navigator))
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.auth.session_store()
    }

    pub async fn require_auth(&self) -> GuardOutcome {
        guards::require_auth(self.session(), self.navigator.as_ref()).await
    }

    pub async fn require_admin(&self) -> GuardOutcome {
        guards::require_admin(self.session(), self.navigator.as_ref()).await
    }
}
