//! Runs each work unit as a child process.
//!
//! The child is invoked as `<program> <command_line...> --chain <chain>`
//! with the `KEY=VALUE` pairs of the work unit's environment string (separated
//! by `;`) added to its environment. Failures are logged, never returned.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;

use chainscrape_core::config::WorkUnit;
use chainscrape_core::dispatch::WorkDispatcher;
use chainscrape_core::error::ScrapeError;

#[derive(Debug, Clone)]
pub struct ProcessDispatcher {
    program: PathBuf,
}

impl ProcessDispatcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument vector for `work`, excluding the program itself.
    pub fn args(work: &WorkUnit) -> Vec<String> {
        let mut args: Vec<String> = work
            .command_line
            .split_whitespace()
            .map(str::to_string)
            .collect();
        args.push("--chain".into());
        args.push(work.chain.clone());
        args
    }

    /// `KEY=VALUE` pairs from the environment string. Malformed entries are skipped.
    pub fn env_pairs(environment: &str) -> Vec<(String, String)> {
        environment
            .split(';')
            .filter_map(|entry| {
                let (key, value) = entry.trim().split_once('=')?;
                let key = key.trim();
                (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl WorkDispatcher for ProcessDispatcher {
    async fn dispatch(&self, work: &WorkUnit) {
        let status = tokio::process::Command::new(&self.program)
            .args(Self::args(work))
            .envs(Self::env_pairs(&work.environment))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                tracing::debug!(work = %work.name, chain = %work.chain, "work unit finished");
            }
            Ok(status) => {
                tracing::warn!(
                    work = %work.name,
                    chain = %work.chain,
                    code = ?status.code(),
                    "work unit exited with failure"
                );
            }
            Err(e) => {
                let err = ScrapeError::Dispatch {
                    work: work.name.clone(),
                    reason: e.to_string(),
                };
                tracing::warn!(program = %self.program.display(), error = %err, "failed to launch work unit");
            }
        }
    }
}
