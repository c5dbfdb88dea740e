//! chainscrape-core — adaptive polling control loop for an index scraper.
//!
//! # Architecture
//!
//! ```text
//! PollLoop
//!   ├── ScraperState          (running/paused flag, blocking pause)
//!   ├── WorkDispatcher        (runs one unit of indexing work)
//!   ├── HeadDistanceEstimator (chain head vs. staged progress)
//!   ├── TestTerminationGuard  (bounded test runs via TEST_END_SCRAPE)
//!   └── CompletionSignal      (single-fire report to the supervisor)
//! ```

pub mod backoff;
pub mod builder;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod poll_loop;
pub mod progress;
pub mod state;

pub use backoff::{BackoffDecision, BackoffReason};
pub use builder::ScraperBuilder;
pub use completion::{CompletionSignal, CompletionWaiter, ExitReason, LoopExit};
pub use config::{PollConfig, WorkUnit};
pub use dispatch::WorkDispatcher;
pub use error::ScrapeError;
pub use guard::{TerminationCause, TerminationThreshold, TestTerminationGuard};
pub use poll_loop::PollLoop;
pub use progress::{ChainProgress, HeadDistanceEstimator};
pub use state::{PauseOutcome, ScraperState, ScraperStatus};
