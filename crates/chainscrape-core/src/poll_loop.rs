//! The adaptive poll loop.
//!
//! Each iteration:
//!   - parks on [`ScraperState::pause`] while the scraper is inactive
//!   - dispatches one work unit and waits for it
//!   - measures the distance to head (falling back to [`FALLBACK_DISTANCE`])
//!   - consults the test-termination guard
//!   - backs off for `sleep_seconds` when close to head or when the
//!     operator chose an explicit sleep
//!
//! In production the loop never returns; the host process is stopped from
//! outside and the completion signal fires when the future is dropped.

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::backoff::{self, BackoffReason};
use crate::completion::{CompletionSignal, ExitReason};
use crate::config::{PollConfig, WorkUnit, FALLBACK_DISTANCE};
use crate::dispatch::WorkDispatcher;
use crate::guard::{TerminationCause, TestTerminationGuard};
use crate::progress::HeadDistanceEstimator;
use crate::state::ScraperState;

pub struct PollLoop<E, D> {
    config: PollConfig,
    work: WorkUnit,
    state: Arc<ScraperState>,
    estimator: E,
    dispatcher: D,
    guard: TestTerminationGuard,
}

impl<E: HeadDistanceEstimator, D: WorkDispatcher> PollLoop<E, D> {
    /// Build a loop whose termination guard is read from `TEST_END_SCRAPE`.
    pub fn new(
        config: PollConfig,
        work: WorkUnit,
        state: Arc<ScraperState>,
        estimator: E,
        dispatcher: D,
    ) -> Self {
        Self {
            config,
            work,
            state,
            estimator,
            dispatcher,
            guard: TestTerminationGuard::from_env(),
        }
    }

    /// Replace the termination guard.
    pub fn with_guard(mut self, guard: TestTerminationGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Current settings, including any sleep raised by the loop.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Run until the test-termination guard fires.
    ///
    /// `completion` is released exactly once on every exit path, including
    /// this future being dropped mid-iteration.
    pub async fn run(&mut self, mut completion: CompletionSignal) -> TerminationCause {
        self.state.set_active(true);
        tracing::info!(
            chain = %self.config.chain,
            work = %self.work.name,
            sleep_seconds = self.config.sleep_seconds,
            unripe_distance = self.config.unripe_distance,
            "index scraper started"
        );

        loop {
            if !self.state.is_active() {
                tracing::info!(chain = %self.config.chain, "index scraper paused");
                self.state.pause().await;
                continue;
            }

            tracing::debug!(
                work = %self.work.name,
                chain = %self.work.chain,
                iteration = completion.iterations() + 1,
                "dispatching work unit"
            );
            self.dispatcher.dispatch(&self.work).await;
            completion.record_iteration();

            if !self.state.is_active() {
                continue;
            }

            if let ControlFlow::Break(cause) = self.back_off().await {
                completion.set_reason(ExitReason::TestTermination(cause.clone()));
                return cause;
            }
        }
    }

    async fn back_off(&mut self) -> ControlFlow<TerminationCause> {
        let progress = match self.estimator.fetch_progress(&self.config.chain).await {
            Ok(progress) => Some(progress),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    chain = %self.config.chain,
                    fallback_distance = FALLBACK_DISTANCE,
                    "error from node"
                );
                None
            }
        };

        if let Some(cause) = self.guard.should_terminate(progress.map(|p| p.staging_block)) {
            tracing::error!(%cause, "quitting early");
            return ControlFlow::Break(cause);
        }

        let distance = progress.map_or(FALLBACK_DISTANCE, |p| p.distance());
        let decision = backoff::decide(&self.config, distance);
        self.config.sleep_seconds = decision.sleep_seconds;

        match decision.reason {
            Some(BackoffReason::CloseToHead) => tracing::info!(
                sleep_seconds = decision.sleep_seconds,
                distance,
                "close enough to head; sleeping"
            ),
            Some(BackoffReason::ExplicitSleep) => tracing::info!(
                sleep_seconds = decision.sleep_seconds,
                distance,
                "sleeping"
            ),
            None => return ControlFlow::Continue(()),
        }

        self.state.pause_for(decision.sleep()).await;
        ControlFlow::Continue(())
    }
}
