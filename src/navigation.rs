//! Navigation destinations and the redirect seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP pipeline and the route guards both need to send the user
//! somewhere else. They do it through `Navigator`, so the presentation layer
//! (a CLI here, a router elsewhere) decides what a redirect means.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use parking_lot::Mutex;

/// Destinations the client can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing page; also the default destination for signed-in users.
    Home,
    /// Sign-in page.
    Login,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives redirect requests.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that remembers every redirect it was asked to perform.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent redirect, if any.
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.history.lock().last().copied()
    }

    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.history.lock().push(route);
    }
}
