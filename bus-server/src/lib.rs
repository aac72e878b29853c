//! Bus stop arrival board server.
//!
//! Scrapes an upstream HTML transit tracker for a stop's real-time bus
//! arrivals, extracts structured estimates, and serves a board page that
//! refreshes itself on a fixed schedule.

pub mod domain;
pub mod extract;
pub mod refresh;
pub mod upstream;
pub mod web;
