//! Navigation-time helpers shared by every protected view.

pub mod guards;
