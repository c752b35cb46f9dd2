//! Networking modules for the remote REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` moves requests over the wire, `api` is the authenticated
//! pipeline every store goes through, and `types` defines the wire schema.

pub mod api;
pub mod transport;
pub mod types;
