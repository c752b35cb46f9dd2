//! Deck store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the deck list of whichever user is being viewed plus the deck that
//! is open. Mutations keep `current_deck` in step with the server's reply and
//! refresh the signed-in user's deck list afterwards.

#[cfg(test)]
#[path = "decks_test.rs"]
mod decks_test;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::IgnoredAny;

use super::{Loading, LoadingGuard, failure_message};
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::{Deck, DeckCardRequest, DeckPatch, DeckResponse, DecksResponse, NewDeck};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecksState {
    pub user_decks: Vec<Deck>,
    pub current_deck: Option<Deck>,
    pub loading: bool,
    in_flight: u32,
    pub error: Option<String>,
}

impl Loading for DecksState {
    fn in_flight(&mut self) -> &mut u32 {
        &mut self.in_flight
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[derive(Clone)]
pub struct DeckStore {
    api: ApiClient,
    state: Arc<RwLock<DecksState>>,
}

impl DeckStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, state: Arc::new(RwLock::new(DecksState::default())) }
    }

    #[must_use]
    pub fn snapshot(&self) -> DecksState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn user_decks(&self) -> Vec<Deck> {
        self.state.read().user_decks.clone()
    }

    #[must_use]
    pub fn current_deck(&self) -> Option<Deck> {
        self.state.read().current_deck.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    fn signed_in(&self) -> bool {
        self.api.session().is_authenticated()
    }

    fn begin(&self) -> LoadingGuard<DecksState> {
        let guard = LoadingGuard::begin(&self.state);
        self.state.write().error = None;
        guard
    }

    fn fail(&self, action: &str, err: &ApiError, fallback: &str) {
        self.state.write().error = Some(failure_message(action, err, fallback));
    }

    /// Unwrap a single-deck reply, recording a server-reported error.
    fn accept(&self, resp: DeckResponse, fallback: &str) -> Option<Deck> {
        if let Some(message) = resp.error {
            self.state.write().error = Some(message);
            return None;
        }
        if resp.deck.is_none() {
            self.state.write().error = Some(fallback.to_owned());
        }
        resp.deck
    }

    /// Replace `current_deck` when it is the deck the server just returned.
    fn sync_current(&self, deck_id: &str, deck: Option<&Deck>) {
        let mut state = self.state.write();
        if state.current_deck.as_ref().is_some_and(|current| current.id == deck_id) {
            state.current_deck = deck.cloned();
        }
    }

    async fn refresh_own_decks(&self) {
        if let Some(user_id) = self.api.session().user_id() {
            self.fetch_user_decks(&user_id).await;
        }
    }

    pub async fn fetch_user_decks(&self, user_id: &str) {
        if !self.signed_in() {
            return;
        }
        let _loading = self.begin();

        match self.api.get::<DecksResponse>(&format!("/decks/user/{user_id}")).await {
            Ok(resp) => {
                let mut state = self.state.write();
                state.user_decks = resp.decks;
                if let Some(message) = resp.error {
                    state.error = Some(message);
                }
            }
            Err(err) => self.fail("fetch_user_decks", &err, "Failed to fetch decks"),
        }
    }

    /// Load one deck and make it current.
    pub async fn fetch_deck(&self, deck_id: &str) -> Option<Deck> {
        if !self.signed_in() {
            return None;
        }
        let _loading = self.begin();

        match self.api.get::<DeckResponse>(&format!("/decks/{deck_id}")).await {
            Ok(resp) => {
                let deck = self.accept(resp, "Failed to fetch deck")?;
                self.state.write().current_deck = Some(deck.clone());
                Some(deck)
            }
            Err(err) => {
                self.fail("fetch_deck", &err, "Failed to fetch deck");
                None
            }
        }
    }

    /// Create a deck owned by the signed-in user.
    pub async fn create_deck(&self, deck: &NewDeck) -> Option<Deck> {
        self.create_at("/decks".to_owned(), deck).await
    }

    /// Create a deck owned by `user_id`.
    pub async fn create_deck_for_user(&self, deck: &NewDeck, user_id: &str) -> Option<Deck> {
        self.create_at(format!("/decks/user/{user_id}"), deck).await
    }

    async fn create_at(&self, path: String, deck: &NewDeck) -> Option<Deck> {
        if !self.signed_in() {
            return None;
        }
        let _loading = self.begin();

        match self.api.post::<DeckResponse, _>(&path, deck).await {
            Ok(resp) => {
                let created = self.accept(resp, "Failed to create deck")?;
                self.refresh_own_decks().await;
                Some(created)
            }
            Err(err) => {
                self.fail("create_deck", &err, "Failed to create deck");
                None
            }
        }
    }

    pub async fn update_deck(&self, deck_id: &str, patch: &DeckPatch) -> Option<Deck> {
        if !self.signed_in() {
            return None;
        }
        let _loading = self.begin();

        match self.api.put::<DeckResponse, _>(&format!("/decks/{deck_id}"), patch).await {
            Ok(resp) => {
                let updated = self.accept(resp, "Failed to update deck")?;
                self.sync_current(deck_id, Some(&updated));
                self.refresh_own_decks().await;
                Some(updated)
            }
            Err(err) => {
                self.fail("update_deck", &err, "Failed to update deck");
                None
            }
        }
    }

    /// Delete a deck. Returns whether the server accepted the deletion.
    pub async fn remove_deck(&self, deck_id: &str) -> bool {
        if !self.signed_in() {
            return false;
        }
        let _loading = self.begin();

        match self.api.delete::<IgnoredAny>(&format!("/decks/{deck_id}")).await {
            Ok(_) => {
                self.sync_current(deck_id, None);
                self.refresh_own_decks().await;
                true
            }
            Err(err) => {
                self.fail("remove_deck", &err, "Failed to remove deck");
                false
            }
        }
    }

    pub async fn add_user_card_to_deck(&self, deck_id: &str, user_card_id: &str) -> Option<Deck> {
        if !self.signed_in() {
            return None;
        }
        let _loading = self.begin();

        let path = format!("/decks/{deck_id}/user-cards/{user_card_id}");
        match self.api.post_empty::<DeckResponse>(&path).await {
            Ok(resp) => self.apply_card_change(deck_id, resp, "Failed to add card to deck"),
            Err(err) => {
                self.fail("add_user_card_to_deck", &err, "Failed to add card to deck");
                None
            }
        }
    }

    /// Add a card to another user's deck (admin screens).
    pub async fn add_user_card_to_deck_for_user(
        &self,
        user_id: &str,
        deck_id: &str,
        user_card_id: &str,
    ) -> Option<Deck> {
        if !self.signed_in() {
            return None;
        }
        let _loading = self.begin();

        let path = format!("/decks/user/{user_id}/{deck_id}/user-cards");
        let body = DeckCardRequest { user_card_id };
        match self.api.post::<DeckResponse, _>(&path, &body).await {
            Ok(resp) => self.apply_card_change(deck_id, resp, "Failed to add card to deck"),
            Err(err) => {
                self.fail("add_user_card_to_deck_for_user", &err, "Failed to add card to deck");
                None
            }
        }
    }

    pub async fn remove_user_card_from_deck(&self, deck_id: &str, user_card_id: &str) -> Option<Deck> {
        if !self.signed_in() {
            return None;
        }
        let _loading = self.begin();

        let path = format!("/decks/{deck_id}/user-cards/{user_card_id}");
        match self.api.delete::<DeckResponse>(&path).await {
            Ok(resp) => self.apply_card_change(deck_id, resp, "Failed to remove card from deck"),
            Err(err) => {
                self.fail("remove_user_card_from_deck", &err, "Failed to remove card from deck");
                None
            }
        }
    }

    fn apply_card_change(&self, deck_id: &str, resp: DeckResponse, fallback: &str) -> Option<Deck> {
        let deck = self.accept(resp, fallback)?;
        self.sync_current(deck_id, Some(&deck));
        Some(deck)
    }
}
