use std::fmt;

use serde::{Deserialize, Serialize};

/// 1-based identity of a dispatcher worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(usize);

impl WorkerId {
    #[inline]
    pub const fn new(n: usize) -> Self {
        Self(n)
    }

    #[inline]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Lifecycle of a single worker: `Idle -> Running -> Idle -> ... -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerState {
    /// Between tasks, about to claim the next one.
    Idle,
    /// Waiting on the external command for a claimed task.
    Running,
    /// Observed an empty queue (or was cancelled); never runs again.
    Done,
}

impl WorkerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Done)
    }
}
