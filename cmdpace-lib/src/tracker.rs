//! Completion tracker for launched tasks.
//!
//! Tasks are tracked only by count; completions arrive in whatever order
//! the children finish. Workers never terminate the process themselves;
//! they report a typed result, and the driver observes the first failure
//! and shuts the run down exactly once.

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::error::CmdPaceError;
use crate::Result;

/// Tracks launched-but-unfinished tasks and drains their results.
#[derive(Default)]
pub(crate) struct CompletionTracker {
    inflight: FuturesUnordered<JoinHandle<Result<()>>>,
    launched: usize,
}

impl CompletionTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Total number of tasks ever tracked.
    pub(crate) fn launched(&self) -> usize {
        self.launched
    }

    /// Register a freshly spawned task.
    pub(crate) fn track(&mut self, handle: JoinHandle<Result<()>>) {
        self.launched += 1;
        self.inflight.push(handle);
    }

    /// Wait for the next task to finish, in completion order.
    ///
    /// Returns `None` when nothing is in flight. A panicked task surfaces
    /// as an internal error rather than poisoning the tracker.
    pub(crate) async fn next_completion(&mut self) -> Option<Result<()>> {
        let joined = self.inflight.next().await?;
        Some(match joined {
            Ok(result) => result,
            Err(err) => Err(CmdPaceError::internal(format!("task panicked: {}", err))),
        })
    }

    /// Block until every tracked task has finished, or until the first
    /// failure, whichever comes first.
    pub(crate) async fn wait_all(&mut self) -> Result<()> {
        while let Some(result) = self.next_completion().await {
            result?;
        }
        Ok(())
    }
}
