//! Backoff decision taken after every work unit.
//!
//! The loop idles under two conditions: the operator picked an explicit
//! sleep, or the worker is close enough to the head that new blocks are not
//! yet ripe. Near the head the sleep is raised to at least
//! [`MIN_CLOSE_ENOUGH_SLEEP_SECS`].

use std::time::Duration;

use crate::config::{PollConfig, DEFAULT_SLEEP_VARIANTS, MIN_CLOSE_ENOUGH_SLEEP_SECS};

/// Why the loop is about to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffReason {
    /// Distance to head is within twice the unripe distance.
    CloseToHead,
    /// The operator set a non-default sleep.
    ExplicitSleep,
}

/// Result of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffDecision {
    /// Sleep to use from now on. Never lower than the configured value.
    pub sleep_seconds: u64,
    pub distance: u64,
    pub close_enough: bool,
    /// `None` means continue immediately.
    pub reason: Option<BackoffReason>,
}

impl BackoffDecision {
    pub fn should_pause(&self) -> bool {
        self.reason.is_some()
    }

    pub fn sleep(&self) -> Duration {
        Duration::from_secs(self.sleep_seconds)
    }
}

/// `true` when `distance <= 2 * unripe_distance`.
pub fn is_close_enough(distance: u64, unripe_distance: u64) -> bool {
    distance <= unripe_distance.saturating_mul(2)
}

pub fn decide(config: &PollConfig, distance: u64) -> BackoffDecision {
    let close_enough = is_close_enough(distance, config.unripe_distance);

    let mut sleep_seconds = config.sleep_seconds;
    if close_enough && sleep_seconds < MIN_CLOSE_ENOUGH_SLEEP_SECS {
        sleep_seconds = MIN_CLOSE_ENOUGH_SLEEP_SECS;
    }

    let is_default_sleep = DEFAULT_SLEEP_VARIANTS.contains(&sleep_seconds);
    let reason = if close_enough {
        Some(BackoffReason::CloseToHead)
    } else if !is_default_sleep {
        Some(BackoffReason::ExplicitSleep)
    } else {
        None
    };

    BackoffDecision {
        sleep_seconds,
        distance,
        close_enough,
        reason,
    }
}
