//! Fluent builder for the loop's configuration and work unit.
//!
//! # Example
//!
//! ```rust
//! use chainscrape_core::ScraperBuilder;
//!
//! let (config, work) = ScraperBuilder::new()
//!     .chain("gnosis")
//!     .sleep_seconds(30)
//!     .command_line("--block_cnt 2000")
//!     .build();
//! assert_eq!(work.chain, "gnosis");
//! assert_eq!(config.sleep_seconds, 30);
//! ```

use crate::config::{PollConfig, WorkUnit, DEFAULT_WORK_NAME};

/// Builds a matching `PollConfig` / `WorkUnit` pair.
pub struct ScraperBuilder {
    config: PollConfig,
    work_name: String,
    command_line: String,
    environment: String,
}

impl ScraperBuilder {
    pub fn new() -> Self {
        Self {
            config: PollConfig::default(),
            work_name: DEFAULT_WORK_NAME.into(),
            command_line: String::new(),
            environment: String::new(),
        }
    }

    /// Start from an existing configuration (e.g. one read from a file).
    pub fn from_config(config: PollConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Set the chain to scrape.
    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.config.chain = chain.into();
        self
    }

    /// Set the idle time between work units.
    pub fn sleep_seconds(mut self, secs: u64) -> Self {
        self.config.sleep_seconds = secs;
        self
    }

    /// Set the number of unripe blocks near the head.
    pub fn unripe_distance(mut self, blocks: u64) -> Self {
        self.config.unripe_distance = blocks;
        self
    }

    pub fn work_name(mut self, name: impl Into<String>) -> Self {
        self.work_name = name.into();
        self
    }

    /// Arguments passed through to the work unit.
    pub fn command_line(mut self, cmd: impl Into<String>) -> Self {
        self.command_line = cmd.into();
        self
    }

    /// Environment string passed through to the work unit.
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environment = env.into();
        self
    }

    pub fn build(self) -> (PollConfig, WorkUnit) {
        let work = WorkUnit::new(
            self.work_name,
            self.config.chain.clone(),
            self.command_line,
            self.environment,
        );
        (self.config, work)
    }
}

impl Default for ScraperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let (cfg, work) = ScraperBuilder::new().build();
        assert_eq!(cfg.chain, "mainnet");
        assert_eq!(cfg.sleep_seconds, 14);
        assert_eq!(cfg.unripe_distance, 28);
        assert_eq!(work.name, "blockScrape");
        assert_eq!(work.chain, "mainnet");
    }

    #[test]
    fn builder_custom() {
        let (cfg, work) = ScraperBuilder::new()
            .chain("sepolia")
            .sleep_seconds(3)
            .unripe_distance(6)
            .work_name("scrape-worker")
            .environment("CHIFRA_TEST=1")
            .build();

        assert_eq!(cfg.chain, "sepolia");
        assert_eq!(cfg.sleep_seconds, 3);
        assert_eq!(cfg.unripe_distance, 6);
        assert_eq!(work.name, "scrape-worker");
        assert_eq!(work.chain, "sepolia");
        assert_eq!(work.environment, "CHIFRA_TEST=1");
    }
}
