//! Chain head vs. worker progress, and the trait that measures it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Head and staging heights reported by a [`HeadDistanceEstimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainProgress {
    /// Current chain head as reported by the node.
    pub latest_block: u64,
    /// Highest block the worker has fully staged.
    pub staging_block: u64,
}

impl ChainProgress {
    pub fn new(latest_block: u64, staging_block: u64) -> Self {
        Self {
            latest_block,
            staging_block,
        }
    }

    /// Blocks the worker lags behind the head. Clamped to zero when staging
    /// is ahead of the reported head.
    pub fn distance(&self) -> u64 {
        self.latest_block.saturating_sub(self.staging_block)
    }
}

/// Reports how far the worker lags behind the live chain head.
#[async_trait]
pub trait HeadDistanceEstimator: Send + Sync {
    async fn fetch_progress(&self, chain: &str) -> Result<ChainProgress, ScrapeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_behind_head() {
        let p = ChainProgress::new(19_000_100, 19_000_000);
        assert_eq!(p.distance(), 100);
    }

    #[test]
    fn distance_clamps_when_staging_is_ahead() {
        let p = ChainProgress::new(500, 510);
        assert_eq!(p.distance(), 0);
    }
}
