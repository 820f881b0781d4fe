//! Shared FIFO of grid tasks.
//!
//! The queue is filled completely before any worker starts and then only
//! drained. `try_take` checks for emptiness and removes the head under one
//! lock, so a worker that loses the race for the last task simply sees `None`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use gridrun_model::SimTask;

#[derive(Default)]
pub struct TaskQueue {
    inner: Mutex<VecDeque<SimTask>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, task: SimTask) {
        self.lock().push_back(task);
    }

    /// Remove and return the head, or `None` if the queue is drained.
    pub fn try_take(&self) -> Option<SimTask> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-moved task behind.
    fn lock(&self) -> MutexGuard<'_, VecDeque<SimTask>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FromIterator<SimTask> for TaskQueue {
    fn from_iter<I: IntoIterator<Item = SimTask>>(iter: I) -> Self {
        Self {
            inner: Mutex::new(iter.into_iter().collect()),
        }
    }
}
