//! Route guards run before entering a protected view.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected views share identical redirect behavior: hydrate the session
//! lazily on first protected navigation, then send unauthenticated users to
//! the login page and signed-in non-admins to the home page.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use crate::navigation::{Navigator, Route};
use crate::state::session::SessionStore;

/// Verdict of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Route),
}

impl GuardOutcome {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

/// Allow navigation only for an authenticated session.
pub async fn require_auth(store: &SessionStore, navigator: &dyn Navigator) -> GuardOutcome {
    hydrate_if_needed(store).await;
    let outcome = if store.handle().is_authenticated() { GuardOutcome::Allow } else { GuardOutcome::Redirect(Route::Login) };
    follow(outcome, navigator)
}

/// Allow navigation only for an authenticated admin.
pub async fn require_admin(store: &SessionStore, navigator: &dyn Navigator) -> GuardOutcome {
    hydrate_if_needed(store).await;
    let handle = store.handle();
    let outcome = if !handle.is_authenticated() {
        GuardOutcome::Redirect(Route::Login)
    } else if !handle.is_admin() {
        GuardOutcome::Redirect(Route::Home)
    } else {
        GuardOutcome::Allow
    };
    follow(outcome, navigator)
}

async fn hydrate_if_needed(store: &SessionStore) {
    let handle = store.handle();
    if !handle.is_authenticated() && handle.has_durable_storage() {
        store.bootstrap().await;
    }
}

fn follow(outcome: GuardOutcome, navigator: &dyn Navigator) -> GuardOutcome {
    if let GuardOutcome::Redirect(route) = outcome {
        tracing::debug!(%route, "guard redirect");
        navigator.navigate(route);
    }
    outcome
}
