//! Head-distance estimator built from a head client and a staging folder.

use async_trait::async_trait;

use chainscrape_core::error::ScrapeError;
use chainscrape_core::progress::{ChainProgress, HeadDistanceEstimator};

use crate::rpc::ChainHeadClient;
use crate::staging::StagingFolder;

/// Measures one chain: head from `client`, staging from `staging`.
pub struct NodeProgressEstimator<C> {
    chain: String,
    client: C,
    staging: StagingFolder,
}

impl<C: ChainHeadClient> NodeProgressEstimator<C> {
    pub fn new(chain: impl Into<String>, client: C, staging: StagingFolder) -> Self {
        Self {
            chain: chain.into(),
            client,
            staging,
        }
    }
}

#[async_trait]
impl<C: ChainHeadClient> HeadDistanceEstimator for NodeProgressEstimator<C> {
    async fn fetch_progress(&self, chain: &str) -> Result<ChainProgress, ScrapeError> {
        if chain != self.chain {
            return Err(ScrapeError::Config(format!(
                "estimator for '{}' asked about '{chain}'",
                self.chain
            )));
        }

        let latest_block = self.client.latest_block().await?;
        let staging_block = self.staging.staging_block().await?;
        tracing::trace!(chain, latest_block, staging_block, "measured progress");
        Ok(ChainProgress::new(latest_block, staging_block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHead(Option<u64>);

    #[async_trait]
    impl ChainHeadClient for FixedHead {
        async fn latest_block(&self) -> Result<u64, ScrapeError> {
            self.0.ok_or_else(|| ScrapeError::Rpc("node unavailable".into()))
        }
    }

    #[tokio::test]
    async fn combines_head_and_staging() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("000000000-000000990.txt"), b"").unwrap();

        let est = NodeProgressEstimator::new(
            "mainnet",
            FixedHead(Some(1_000)),
            StagingFolder::new(dir.path()),
        );
        let progress = est.fetch_progress("mainnet").await.unwrap();
        assert_eq!(progress, ChainProgress::new(1_000, 990));
        assert_eq!(progress.distance(), 10);
    }

    #[tokio::test]
    async fn head_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let est = NodeProgressEstimator::new("mainnet", FixedHead(None), StagingFolder::new(dir.path()));
        let err = est.fetch_progress("mainnet").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn wrong_chain_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let est = NodeProgressEstimator::new("mainnet", FixedHead(Some(1)), StagingFolder::new(dir.path()));
        assert!(matches!(
            est.fetch_progress("gnosis").await,
            Err(ScrapeError::Config(_))
        ));
    }
}
