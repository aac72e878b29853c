//! Upstream transit tracker access.
//!
//! The tracker is an opaque data source: a GET parameterized by stop code
//! returning an HTML document body. [`StopSource`] is the seam between the
//! refresh controller and the transport; [`BusTimeClient`] is the real
//! implementation and [`MockStopSource`] the in-memory one for tests.

mod client;
mod error;
mod mock;

pub use client::{BusTimeClient, BusTimeConfig};
pub use error::UpstreamError;
pub use mock::MockStopSource;

use async_trait::async_trait;

use crate::domain::StopCode;

/// Source of raw tracker HTML for a stop.
#[async_trait]
pub trait StopSource: Send + Sync {
    /// Fetch the tracker page body for a stop.
    async fn stop_html(&self, stop: &StopCode) -> Result<String, UpstreamError>;
}
