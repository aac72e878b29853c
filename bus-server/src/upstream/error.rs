//! Upstream transport error types.

/// Errors from the upstream tracker.
///
/// There is deliberately no parse variant: extraction is total and never
/// fails, so everything that can go wrong here is transport.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker returned a non-success status code
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// No fixture registered for the requested stop (mock source only)
    #[error("no data for stop {stop}")]
    NoData { stop: String },
}
