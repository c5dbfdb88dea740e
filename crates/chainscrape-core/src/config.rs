//! Poll loop configuration and the built-in backoff constants.

use serde::{Deserialize, Serialize};

/// Sleep used when the worker is close enough to the head and the operator
/// asked for less.
pub const MIN_CLOSE_ENOUGH_SLEEP_SECS: u64 = 13;

/// Default sleep handed to the loop when the operator does not pick one.
pub const DEFAULT_SLEEP_SECS: u64 = 14;

/// Sleep values treated as "not explicitly chosen". While the sleep is one of
/// these, the loop only backs off near the head.
pub const DEFAULT_SLEEP_VARIANTS: [u64; 2] = [MIN_CLOSE_ENOUGH_SLEEP_SECS, DEFAULT_SLEEP_SECS];

/// Number of near-head blocks considered not yet final.
pub const DEFAULT_UNRIPE_DISTANCE: u64 = 28;

/// Distance assumed when the head-distance estimator fails.
pub const FALLBACK_DISTANCE: u64 = 13;

/// Name of the work unit the loop dispatches on every iteration.
pub const DEFAULT_WORK_NAME: &str = "blockScrape";

/// Immutable loop settings, already validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds to idle between work units. May be raised by the loop, never lowered.
    pub sleep_seconds: u64,
    /// Blocks behind the head that are still considered unripe.
    pub unripe_distance: u64,
    /// Chain slug (e.g. `"mainnet"`).
    pub chain: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            sleep_seconds: DEFAULT_SLEEP_SECS,
            unripe_distance: DEFAULT_UNRIPE_DISTANCE,
            chain: "mainnet".into(),
        }
    }
}

impl PollConfig {
    /// Returns `true` if `sleep_seconds` is one of the built-in defaults.
    pub fn is_default_sleep(&self) -> bool {
        DEFAULT_SLEEP_VARIANTS.contains(&self.sleep_seconds)
    }
}

/// Opaque description of the work unit handed to the dispatcher.
///
/// `command_line` and `environment` are built elsewhere and passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    pub name: String,
    pub chain: String,
    pub command_line: String,
    pub environment: String,
}

impl WorkUnit {
    pub fn new(
        name: impl Into<String>,
        chain: impl Into<String>,
        command_line: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            chain: chain.into(),
            command_line: command_line.into(),
            environment: environment.into(),
        }
    }
}
