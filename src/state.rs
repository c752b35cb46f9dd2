//! Client-side state stores.
//!
//! DESIGN
//! ======
//! State is split by domain: `session` owns the bearer token and profile,
//! while `cards`, `decks`, and `users` each wrap one family of endpoints.
//! Every store keeps its fields behind a `parking_lot::RwLock` that is never
//! held across an `.await`, so reads are synchronous and writes interleave
//! only at network suspension points.

pub mod cards;
pub mod decks;
pub mod session;
pub mod users;

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ApiError;

/// Recorded when a non-admin calls an admin-only action.
pub const ADMIN_REQUIRED: &str = "Unauthorized: Admin access required";
/// Recorded when an action that reports auth problems runs without a token.
pub const AUTH_REQUIRED: &str = "Authentication required";

/// State with an in-flight flag. The flag stays up while any guard on the
/// state is alive, so a refresh nested inside a mutation does not lower it
/// early.
pub(crate) trait Loading {
    fn in_flight(&mut self) -> &mut u32;
    fn set_loading(&mut self, loading: bool);
}

/// Holds a store's `loading` flag up for as long as it lives. Dropping it,
/// including when the owning future is cancelled, clears the flag once no
/// other guard remains.
pub(crate) struct LoadingGuard<S: Loading> {
    state: Arc<RwLock<S>>,
}

impl<S: Loading> LoadingGuard<S> {
    pub(crate) fn begin(state: &Arc<RwLock<S>>) -> Self {
        {
            let mut guarded = state.write();
            *guarded.in_flight() += 1;
            guarded.set_loading(true);
        }
        Self { state: Arc::clone(state) }
    }
}

impl<S: Loading> Drop for LoadingGuard<S> {
    fn drop(&mut self) {
        let mut guarded = self.state.write();
        let idle = {
            let depth = guarded.in_flight();
            *depth = depth.saturating_sub(1);
            *depth == 0
        };
        if idle {
            guarded.set_loading(false);
        }
    }
}

/// Log `err` and return the message a store should record for it.
pub(crate) fn failure_message(action: &str, err: &ApiError, fallback: &str) -> String {
    tracing::warn!(action, error = %err, code = err.error_code(), "store action failed");
    match err {
        ApiError::Unauthorized => ApiError::Unauthorized.to_string(),
        _ => fallback.to_owned(),
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
