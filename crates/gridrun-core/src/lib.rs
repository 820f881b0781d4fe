pub mod error;
pub use error::CoreError;

pub mod grid;
pub use grid::{Grid, enumerate, fill_queue};

pub mod queue;
pub use queue::TaskQueue;

pub mod runner;
pub use runner::{RunOutcome, RunnerError, TaskRunner};

pub mod event;
pub use event::{Bus, Event, EventKind, Subscribe};

mod worker;
pub use worker::WorkerReport;

pub mod dispatcher;
pub use dispatcher::{DispatchConfig, DispatchSummary, Dispatcher, available_cores, worker_count};
