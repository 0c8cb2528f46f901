//! Stage-boundary progress reporting.
//!
//! The engine announces when a pipeline stage starts and finishes; what a
//! listener does with that (spinner, log lines, nothing) is its own business.
//! Progress is strictly cosmetic; no stage ever depends on a listener.

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchPullRequests,
    IdentifyViewer,
    Rank,
}

pub trait Progress: Send + Sync {
    fn begin(&self, _stage: Stage, _message: &str) {}
    fn end(&self, _stage: Stage, _summary: &str) {}
}

/// Listener that ignores everything.
pub struct NoProgress;

impl Progress for NoProgress {}
