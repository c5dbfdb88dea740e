//! Single-fire completion signal owed by the poll loop to its supervisor.
//!
//! The signal is a drop guard: it fires when the loop returns, when the
//! loop's future is dropped (task aborted, runtime shut down), and on unwind.
//! A `oneshot` channel makes a second delivery impossible.

use tokio::sync::oneshot;

use crate::guard::TerminationCause;

/// Why the poll loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The test-termination guard fired.
    TestTermination(TerminationCause),
    /// The loop was dropped without returning, e.g. on process shutdown.
    Aborted,
}

/// Final report delivered to the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopExit {
    pub reason: ExitReason,
    /// Work units dispatched before exit.
    pub iterations: u64,
}

/// Sender half, owned by the running loop.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: Option<oneshot::Sender<LoopExit>>,
    reason: ExitReason,
    iterations: u64,
}

/// Receiver half, held by the supervisor.
#[derive(Debug)]
pub struct CompletionWaiter {
    rx: oneshot::Receiver<LoopExit>,
}

impl CompletionSignal {
    pub fn new() -> (Self, CompletionWaiter) {
        let (tx, rx) = oneshot::channel();
        let signal = Self {
            tx: Some(tx),
            reason: ExitReason::Aborted,
            iterations: 0,
        };
        (signal, CompletionWaiter { rx })
    }

    pub(crate) fn record_iteration(&mut self) {
        self.iterations += 1;
    }

    pub(crate) fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Set the reason reported when the guard drops.
    pub(crate) fn set_reason(&mut self, reason: ExitReason) {
        self.reason = reason;
    }
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let exit = LoopExit {
                reason: std::mem::replace(&mut self.reason, ExitReason::Aborted),
                iterations: self.iterations,
            };
            // The supervisor may have stopped listening.
            let _ = tx.send(exit);
        }
    }
}

impl CompletionWaiter {
    /// Wait for the loop to finish.
    pub async fn wait(self) -> LoopExit {
        self.rx.await.unwrap_or(LoopExit {
            reason: ExitReason::Aborted,
            iterations: 0,
        })
    }

    /// Non-blocking check. `None` while the loop is still running.
    pub fn try_wait(&mut self) -> Option<LoopExit> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fires_on_drop_as_aborted() {
        let (mut signal, waiter) = CompletionSignal::new();
        signal.record_iteration();
        drop(signal);

        let exit = waiter.wait().await;
        assert_eq!(exit.reason, ExitReason::Aborted);
        assert_eq!(exit.iterations, 1);
    }

    #[tokio::test]
    async fn reports_recorded_reason() {
        let (mut signal, waiter) = CompletionSignal::new();
        let cause = TerminationCause::ThresholdExceeded {
            threshold: 5,
            staging: 6,
        };
        signal.set_reason(ExitReason::TestTermination(cause.clone()));
        drop(signal);

        assert_eq!(waiter.wait().await.reason, ExitReason::TestTermination(cause));
    }

    #[test]
    fn silent_while_held() {
        let (signal, mut waiter) = CompletionSignal::new();
        assert!(waiter.try_wait().is_none());
        drop(signal);
        assert!(waiter.try_wait().is_some());
        // consumed: a second read sees nothing
        assert!(waiter.try_wait().is_none());
    }
}
