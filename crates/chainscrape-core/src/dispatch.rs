//! The work unit dispatcher seam.

use async_trait::async_trait;

use crate::config::WorkUnit;

/// Runs one unit of indexing work to completion.
///
/// The loop has no result channel: implementations log their own failures.
/// Calls are never overlapped by the poll loop.
#[async_trait]
pub trait WorkDispatcher: Send + Sync {
    async fn dispatch(&self, work: &WorkUnit);
}
