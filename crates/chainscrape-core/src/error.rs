//! Error types for the scrape control loop.

use thiserror::Error;

/// Errors surfaced by the scraper's collaborators.
///
/// The poll loop itself never returns these: measurement errors degrade the
/// backoff decision and dispatch errors are logged by the dispatcher.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Staging folder error at '{path}': {reason}")]
    Staging { path: String, reason: String },

    #[error("Dispatch of '{work}' failed: {reason}")]
    Dispatch { work: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Returns `true` if the next iteration may reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc(_) | Self::Staging { .. } | Self::Dispatch { .. })
    }
}
