//! Dispatch events and the subscriber seam.
//!
//! Workers and the dispatcher publish [`Event`]s to a [`Bus`]; subscribers
//! decide what to do with them (log, print, record in tests).

use std::sync::Arc;

use gridrun_model::{SimTask, WorkerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // dispatcher
    DispatchStarted,
    ShutdownRequested,
    GraceExceeded,
    AllStopped,

    // worker lifecycle
    WorkerStarted,
    WorkerDone,

    // task lifecycle
    TaskStarting,
    TaskFinished,
    TaskFailed,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub worker: Option<WorkerId>,
    pub task: Option<SimTask>,
    /// Process exit code for `TaskFinished`; `None` if killed by signal or not applicable.
    pub exit_code: Option<i32>,
    /// Task or worker count, depending on the event.
    pub count: Option<usize>,
    /// Pool size for `DispatchStarted`.
    pub workers: Option<usize>,
    pub reason: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            worker: None,
            task: None,
            exit_code: None,
            count: None,
            workers: None,
            reason: None,
        }
    }

    pub fn with_worker(mut self, worker: WorkerId) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn with_task(mut self, task: SimTask) -> Self {
        self.task = Some(task);
        self
    }

    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

pub trait Subscribe: Send + Sync {
    fn on_event(&self, event: &Event);

    fn name(&self) -> &'static str;
}

/// Fan-out to a fixed set of subscribers, cheap to clone into every worker.
#[derive(Clone, Default)]
pub struct Bus {
    subscribers: Arc<[Arc<dyn Subscribe>]>,
}

impl Bus {
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            subscribers: subscribers.into(),
        }
    }

    pub fn publish(&self, event: &Event) {
        for sub in self.subscribers.iter() {
            sub.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every event it sees.
    #[derive(Default)]
    pub struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl Recorder {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        pub fn count(&self, kind: EventKind) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.kind == kind)
                .count()
        }
    }

    impl Subscribe for Recorder {
        fn on_event(&self, event: &Event) {
            self.events.lock().unwrap().push(event.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }
}
