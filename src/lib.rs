//! Tournament Master client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Headless client for the Tournament Master API: the session/authorization
//! state machine, the HTTP pipeline that enforces it, route guards, and
//! stores for cards, decks, and users. The `tm` binary drives it from the
//! command line.
//!
//! DESIGN
//! ======
//! - `state::session` owns the token and profile. Everything else reads it
//!   through a shared `SessionHandle`.
//! - `net::api::ApiClient` is the only path to the network. It attaches the
//!   bearer token and turns any 401 into a full sign-out plus a redirect.
//! - `app::App` wires one of each per process.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod navigation;
pub mod net;
pub mod state;
pub mod storage;
pub mod util;
