//! User directory store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Backs the admin user list and the public username directory. Listing and
//! deleting accounts is admin-only; profile edits are allowed for admins and
//! for the account owner, and an edit of the signed-in account is mirrored
//! into the session.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::IgnoredAny;

use super::{ADMIN_REQUIRED, AUTH_REQUIRED, Loading, LoadingGuard, failure_message};
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::transport::ApiRequest;
use crate::net::types::{NewUser, User, UserPatch, UsernamesPage};

/// Usernames requested per directory page.
pub const USERNAMES_PAGE_SIZE: u32 = 20;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsersState {
    pub users: Vec<User>,
    pub usernames: Vec<String>,
    /// Last directory page loaded (1-based; 0 before the first load).
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub loading: bool,
    in_flight: u32,
    pub error: Option<String>,
}

impl UsersState {
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page to request next, if any remain.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.has_more().then_some(self.page + 1)
    }
}

impl Loading for UsersState {
    fn in_flight(&mut self) -> &mut u32 {
        &mut self.in_flight
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[derive(Clone)]
pub struct UserStore {
    api: ApiClient,
    state: Arc<RwLock<UsersState>>,
}

impl UserStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, state: Arc::new(RwLock::new(UsersState::default())) }
    }

    #[must_use]
    pub fn snapshot(&self) -> UsersState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    #[must_use]
    pub fn usernames(&self) -> Vec<String> {
        self.state.read().usernames.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    fn begin(&self) -> LoadingGuard<UsersState> {
        let guard = LoadingGuard::begin(&self.state);
        self.state.write().error = None;
        guard
    }

    fn record(&self, message: &str) {
        self.state.write().error = Some(message.to_owned());
    }

    fn fail(&self, action: &str, err: &ApiError, fallback: &str) {
        self.state.write().error = Some(failure_message(action, err, fallback));
    }

    /// Admin gate followed by the token gate. Records why it refused.
    fn admin_ready(&self) -> bool {
        let session = self.api.session();
        if !session.is_admin() {
            self.record(ADMIN_REQUIRED);
            return false;
        }
        if !session.is_authenticated() {
            self.record(AUTH_REQUIRED);
            return false;
        }
        true
    }

    pub async fn fetch_all_users(&self) {
        if !self.admin_ready() {
            return;
        }
        let _loading = self.begin();

        match self.api.get::<Vec<User>>("/users").await {
            Ok(users) => {
                tracing::debug!(count = users.len(), "fetched users");
                self.state.write().users = users;
            }
            Err(err) => self.fail("fetch_all_users", &err, "Failed to load users"),
        }
    }

    /// Load one page of the username directory. Page 1 replaces the list;
    /// later pages append to it.
    pub async fn fetch_usernames(&self, page: u32) {
        if !self.api.session().is_authenticated() {
            return;
        }
        let page = page.max(1);
        let _loading = self.begin();

        let request = ApiRequest::get("/users/usernames")
            .with_query("page", page)
            .with_query("limit", USERNAMES_PAGE_SIZE);
        match self.api.request_json::<UsernamesPage>(request).await {
            Ok(resp) => {
                let mut state = self.state.write();
                if page == 1 {
                    state.usernames = resp.usernames;
                } else {
                    state.usernames.extend(resp.usernames);
                }
                state.page = if resp.page == 0 { page } else { resp.page };
                state.total_pages = resp.total_pages;
                state.total = resp.total;
            }
            Err(err) => self.fail("fetch_usernames", &err, "Failed to load usernames"),
        }
    }

    /// Load the page after the last one fetched. Returns false when there
    /// is nothing left to load.
    pub async fn fetch_next_usernames(&self) -> bool {
        let Some(next) = self.state.read().next_page() else {
            return false;
        };
        self.fetch_usernames(next).await;
        true
    }

    pub async fn fetch_by_username(&self, username: &str) -> Option<User> {
        if !self.api.session().is_authenticated() {
            return None;
        }
        let _loading = self.begin();

        let request = ApiRequest::get("/users/username").with_query("username", username);
        match self.api.request_json::<User>(request).await {
            Ok(user) => Some(user),
            Err(err) => {
                self.fail("fetch_by_username", &err, "User not found");
                None
            }
        }
    }

    /// Create an account, then reload the admin list.
    pub async fn create_user(&self, user: &NewUser) -> Option<User> {
        if !self.admin_ready() {
            return None;
        }
        let _loading = self.begin();

        match self.api.post::<User, _>("/users", user).await {
            Ok(created) => {
                self.fetch_all_users().await;
                Some(created)
            }
            Err(err) => {
                self.fail("create_user", &err, "Failed to create user");
                None
            }
        }
    }

    /// Patch a profile. Non-admins may only patch their own.
    pub async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Option<User> {
        let session = self.api.session();
        if !session.is_authenticated() {
            return None;
        }
        let is_self = session.user_id().as_deref() == Some(user_id);
        if !session.is_admin() && !is_self {
            self.record(ADMIN_REQUIRED);
            return None;
        }
        let _loading = self.begin();

        match self.api.patch::<User, _>(&format!("/users/{user_id}"), patch).await {
            Ok(updated) => {
                if is_self {
                    self.api.session().refresh_user(&updated);
                }
                let mut state = self.state.write();
                if let Some(slot) = state.users.iter_mut().find(|u| u.id == updated.id) {
                    *slot = updated.clone();
                }
                Some(updated)
            }
            Err(err) => {
                self.fail("update_user", &err, "Failed to update user");
                None
            }
        }
    }

    /// Delete an account. Returns whether the server accepted the deletion.
    pub async fn delete_user(&self, user_id: &str) -> bool {
        if !self.admin_ready() {
            return false;
        }
        let _loading = self.begin();

        match self.api.delete::<IgnoredAny>(&format!("/users/{user_id}")).await {
            Ok(_) => {
                self.state.write().users.retain(|u| u.id != user_id);
                true
            }
            Err(err) => {
                self.fail("delete_user", &err, "Failed to delete user");
                false
            }
        }
    }
}
