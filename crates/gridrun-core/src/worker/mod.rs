use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use gridrun_model::{SimTask, WorkerId, WorkerState};

use crate::{
    event::{Bus, Event, EventKind},
    queue::TaskQueue,
    runner::{RunOutcome, TaskRunner},
};

/// What one worker did before reaching `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: WorkerId,
    /// Tasks taken off the queue.
    pub claimed: usize,
    /// Tasks whose command returned (whatever its exit status).
    pub completed: usize,
}

pub(crate) struct Worker {
    id: WorkerId,
    state: WorkerState,
    queue: Arc<TaskQueue>,
    runner: Arc<dyn TaskRunner>,
    cancel: CancellationToken,
    bus: Bus,
}

impl Worker {
    pub(crate) fn new(
        id: WorkerId,
        queue: Arc<TaskQueue>,
        runner: Arc<dyn TaskRunner>,
        cancel: CancellationToken,
        bus: Bus,
    ) -> Self {
        Self {
            id,
            state: WorkerState::Idle,
            queue,
            runner,
            cancel,
            bus,
        }
    }

    /// Drain the queue one task at a time until it is empty or the run is cancelled.
    pub(crate) async fn run(mut self) -> WorkerReport {
        let mut report = WorkerReport {
            id: self.id,
            claimed: 0,
            completed: 0,
        };
        self.bus
            .publish(&Event::new(EventKind::WorkerStarted).with_worker(self.id));

        while !self.cancel.is_cancelled() {
            let Some(task) = self.queue.try_take() else {
                trace!(target: "gridrun.core.worker", worker = %self.id, "queue drained");
                break;
            };
            report.claimed += 1;
            self.transition(WorkerState::Running);
            self.bus.publish(
                &Event::new(EventKind::TaskStarting)
                    .with_worker(self.id)
                    .with_task(task),
            );

            match self.runner.run(&task, self.cancel.clone()).await {
                Ok(RunOutcome::Cancelled) => {
                    debug!(target: "gridrun.core.worker", worker = %self.id, %task, "cancelled mid-task");
                    break;
                }
                Ok(outcome @ RunOutcome::Exited { code }) => {
                    // Exit status is reported, never acted upon.
                    debug!(
                        target: "gridrun.core.worker",
                        worker = %self.id,
                        %task,
                        success = outcome.is_success(),
                        code = ?code,
                        "task exited"
                    );
                    self.finish(task, code);
                }
                Err(e) => {
                    self.bus.publish(
                        &Event::new(EventKind::TaskFailed)
                            .with_worker(self.id)
                            .with_task(task)
                            .with_reason(e.to_string()),
                    );
                    self.finish(task, None);
                }
            }
            report.completed += 1;
            self.transition(WorkerState::Idle);
        }

        self.transition(WorkerState::Done);
        self.bus.publish(
            &Event::new(EventKind::WorkerDone)
                .with_worker(self.id)
                .with_count(report.completed),
        );
        report
    }

    fn finish(&self, task: SimTask, code: Option<i32>) {
        self.bus.publish(
            &Event::new(EventKind::TaskFinished)
                .with_worker(self.id)
                .with_task(task)
                .with_exit_code(code),
        );
    }

    fn transition(&mut self, next: WorkerState) {
        trace!(
            target: "gridrun.core.worker",
            worker = %self.id,
            from = ?self.state,
            to = ?next,
            "state transition"
        );
        self.state = next;
    }
}
