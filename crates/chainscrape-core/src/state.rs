//! Shared running/paused flag for a scraper.
//!
//! One `ScraperState` is created per worker by the host and shared (via
//! `Arc`) between the poll loop and whatever controls it: a signal handler,
//! an operator command, a test. Every read and write goes through a
//! `tokio::sync::watch` channel, so a wake-up sent while the loop is parked
//! in [`ScraperState::pause`] is never lost.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Observable activity of a scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScraperStatus {
    /// The loop dispatches work units.
    Active,
    /// The loop is parked until reactivated.
    Paused,
}

impl std::fmt::Display for ScraperStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// How a timed backoff pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The full duration elapsed.
    Elapsed,
    /// A controller called [`ScraperState::set_active`] before it elapsed.
    Interrupted,
}

/// Thread-safe activity flag with blocking pause semantics.
#[derive(Debug)]
pub struct ScraperState {
    active: watch::Sender<bool>,
}

impl ScraperState {
    /// Create a state that starts active.
    pub fn new() -> Self {
        let (active, _) = watch::channel(true);
        Self { active }
    }

    /// Set the desired activity. Never blocks; the loop observes the new
    /// value on its next check, and a parked loop is woken.
    pub fn set_active(&self, active: bool) {
        let previous = self.active.send_replace(active);
        if previous != active {
            tracing::info!(status = %self.status(), "scraper state changed");
        }
    }

    /// Current value of the activity flag.
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    pub fn status(&self) -> ScraperStatus {
        if self.is_active() {
            ScraperStatus::Active
        } else {
            ScraperStatus::Paused
        }
    }

    /// Park the caller until the state is active.
    ///
    /// Returns immediately if already active. `wait_for` inspects the current
    /// value before waiting, so an activation racing with this call is seen.
    pub async fn pause(&self) {
        let mut rx = self.active.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|active| *active).await;
    }

    /// Back off for up to `duration`, returning early as soon as a controller
    /// calls [`set_active`](Self::set_active) with any value. Returns at once
    /// if the scraper was deactivated before the backoff started.
    pub async fn pause_for(&self, duration: Duration) -> PauseOutcome {
        let mut rx = self.active.subscribe();
        if !*rx.borrow() {
            return PauseOutcome::Interrupted;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => PauseOutcome::Elapsed,
            _ = rx.changed() => PauseOutcome::Interrupted,
        }
    }
}

impl Default for ScraperState {
    fn default() -> Self {
        Self::new()
    }
}
