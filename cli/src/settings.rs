//! Resolved settings for `chainscrape run`: TOML file first, flags on top.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use chainscrape_core::config::DEFAULT_WORK_NAME;
use chainscrape_core::PollConfig;

use crate::logging::LogConfig;
use crate::RunArgs;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    #[serde(flatten)]
    pub poll: PollConfig,
    pub rpc_url: Option<String>,
    pub rpc_timeout_secs: u64,
    pub staging_dir: Option<PathBuf>,
    pub worker_bin: PathBuf,
    pub command_line: String,
    pub environment: String,
    pub log: LogConfig,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            rpc_url: None,
            rpc_timeout_secs: 30,
            staging_dir: None,
            worker_bin: PathBuf::from(DEFAULT_WORK_NAME),
            command_line: String::new(),
            environment: String::new(),
            log: LogConfig::default(),
        }
    }
}

impl ScrapeSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load the file named by `--config` (if any) and apply the flags.
    pub fn resolve(args: &RunArgs) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply(args);
        settings.validate()?;
        Ok(settings)
    }

    fn apply(&mut self, args: &RunArgs) {
        if let Some(chain) = &args.chain {
            self.poll.chain = chain.clone();
        }
        if let Some(sleep) = args.sleep {
            self.poll.sleep_seconds = sleep;
        }
        if let Some(unripe) = args.unripe_dist {
            self.poll.unripe_distance = unripe;
        }
        if let Some(url) = &args.rpc_url {
            self.rpc_url = Some(url.clone());
        }
        if let Some(secs) = args.rpc_timeout_secs {
            self.rpc_timeout_secs = secs;
        }
        if let Some(dir) = &args.staging_dir {
            self.staging_dir = Some(dir.clone());
        }
        if let Some(bin) = &args.worker_bin {
            self.worker_bin = bin.clone();
        }
        if let Some(cmd) = &args.cmd_line {
            self.command_line = cmd.clone();
        }
        if let Some(env) = &args.worker_env {
            self.environment = env.clone();
        }
        if let Some(level) = &args.log_level {
            self.log.level = level.clone();
        }
        if args.json_logs {
            self.log.json = true;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.poll.chain.is_empty() {
            bail!("--chain must not be empty");
        }
        if self.rpc_url.is_none() {
            bail!("--rpc-url is required (or set rpc_url in the config file)");
        }
        if self.staging_dir.is_none() {
            bail!("--staging-dir is required (or set staging_dir in the config file)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["run"];
        argv.extend_from_slice(extra);
        RunArgs::parse_from(argv)
    }

    #[test]
    fn flags_only() {
        let args = run_args(&[
            "--chain",
            "sepolia",
            "--rpc-url",
            "http://localhost:8545",
            "--staging-dir",
            "/tmp/staging",
            "--sleep",
            "30",
        ]);
        let s = ScrapeSettings::resolve(&args).unwrap();
        assert_eq!(s.poll.chain, "sepolia");
        assert_eq!(s.poll.sleep_seconds, 30);
        assert_eq!(s.poll.unripe_distance, 28);
        assert_eq!(s.worker_bin, PathBuf::from("blockScrape"));
    }

    #[test]
    fn file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrape.toml");
        std::fs::write(
            &path,
            r#"
chain = "gnosis"
sleep_seconds = 5
unripe_distance = 12
rpc_url = "http://node:8545"
staging_dir = "/data/unchained/gnosis/staging"

[log]
level = "debug"
"#,
        )
        .unwrap();

        let args = run_args(&["--config", path.to_str().unwrap(), "--sleep", "20"]);
        let s = ScrapeSettings::resolve(&args).unwrap();
        assert_eq!(s.poll.chain, "gnosis");
        assert_eq!(s.poll.sleep_seconds, 20);
        assert_eq!(s.poll.unripe_distance, 12);
        assert_eq!(s.rpc_url.as_deref(), Some("http://node:8545"));
        assert_eq!(s.log.level, "debug");
    }

    #[test]
    fn missing_rpc_url_is_rejected() {
        let args = run_args(&["--staging-dir", "/tmp/staging"]);
        let err = ScrapeSettings::resolve(&args).unwrap_err();
        assert!(err.to_string().contains("--rpc-url"));
    }
}
