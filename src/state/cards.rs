//! Card collection store.
//!
//! Wraps `/user-cards` (a user's owned cards) and `/cards` (the catalogue).
//! Adding cards to a collection is an admin action; everything else only
//! needs a session.

#[cfg(test)]
#[path = "cards_test.rs"]
mod cards_test;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::IgnoredAny;
use serde_json::Value;

use super::{ADMIN_REQUIRED, Loading, LoadingGuard, failure_message};
use crate::net::api::ApiClient;
use crate::net::types::{AddCardRequest, UserCard, UserCardsResponse};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardsState {
    pub user_cards: Vec<UserCard>,
    /// Last catalogue card looked up with `fetch_card`.
    pub current_card: Option<Value>,
    pub loading: bool,
    in_flight: u32,
    pub error: Option<String>,
}

impl Loading for CardsState {
    fn in_flight(&mut self) -> &mut u32 {
        &mut self.in_flight
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[derive(Clone)]
pub struct CardStore {
    api: ApiClient,
    state: Arc<RwLock<CardsState>>,
}

impl CardStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, state: Arc::new(RwLock::new(CardsState::default())) }
    }

    #[must_use]
    pub fn snapshot(&self) -> CardsState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn user_cards(&self) -> Vec<UserCard> {
        self.state.read().user_cards.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    fn begin(&self) -> LoadingGuard<CardsState> {
        let guard = LoadingGuard::begin(&self.state);
        self.state.write().error = None;
        guard
    }

    fn fail(&self, message: String) {
        self.state.write().error = Some(message);
    }

    pub async fn fetch_user_cards(&self, user_id: &str) {
        if !self.api.session().is_authenticated() {
            return;
        }
        let _loading = self.begin();

        match self.api.get::<UserCardsResponse>(&format!("/user-cards/{user_id}")).await {
            Ok(resp) => self.state.write().user_cards = resp.cards,
            Err(err) => self.fail(failure_message("fetch_user_cards", &err, "Failed to fetch cards")),
        }
    }

    /// Add a catalogue card to `user_id`'s collection, then refresh it.
    pub async fn add_card_to_user(&self, user_id: &str, multiverse_id: &str) {
        if !self.api.session().is_admin() {
            self.fail(ADMIN_REQUIRED.to_owned());
            return;
        }
        let _loading = self.begin();

        let body = AddCardRequest { multiverse_id };
        match self.api.post::<IgnoredAny, _>(&format!("/user-cards/{user_id}"), &body).await {
            Ok(_) => self.fetch_user_cards(user_id).await,
            Err(err) => self.fail(failure_message("add_card_to_user", &err, "Failed to add card")),
        }
    }

    /// Remove an owned card, then refresh `user_id`'s collection.
    pub async fn remove_card(&self, card_id: &str, user_id: &str) {
        if !self.api.session().is_authenticated() {
            return;
        }
        let _loading = self.begin();

        match self.api.delete::<IgnoredAny>(&format!("/user-cards/{card_id}")).await {
            Ok(_) => self.fetch_user_cards(user_id).await,
            Err(err) => self.fail(failure_message("remove_card", &err, "Failed to remove card")),
        }
    }

    /// Look up a catalogue card by multiverse id.
    pub async fn fetch_card(&self, multiverse_id: &str) -> Option<Value> {
        if !self.api.session().is_authenticated() {
            return None;
        }
        let _loading = self.begin();

        match self.api.get::<Value>(&format!("/cards/{multiverse_id}")).await {
            Ok(card) => {
                self.state.write().current_card = Some(card.clone());
                Some(card)
            }
            Err(err) => {
                self.fail(failure_message("fetch_card", &err, "Failed to fetch card"));
                None
            }
        }
    }
}
