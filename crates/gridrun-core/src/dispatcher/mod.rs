//! Bounded worker pool over a pre-filled [`TaskQueue`].
//!
//! `N = min(tasks, cores[, max_workers])` workers drain the queue
//! concurrently. [`Dispatcher::run`] returns once every worker is `Done`.
//! Cancelling the token stops workers from claiming more work and interrupts
//! in-flight runs; workers still alive after `shutdown_grace` are aborted.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use gridrun_model::{GridConfig, WorkerId};

use crate::{
    error::CoreError,
    event::{Bus, Event, EventKind, Subscribe},
    queue::TaskQueue,
    runner::TaskRunner,
    worker::{Worker, WorkerReport},
};

/// Number of processing units available to this process, at least 1.
pub fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Workers to spawn for `tasks` queued tasks.
pub fn worker_count(tasks: usize, cores: usize, max_workers: Option<usize>) -> usize {
    let n = tasks.min(cores.max(1));
    match max_workers {
        Some(max) => n.min(max),
        None => n,
    }
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub cores: usize,
    pub max_workers: Option<usize>,
    pub shutdown_grace: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cores: available_cores(),
            max_workers: None,
            shutdown_grace: Duration::from_secs(2),
        }
    }
}

impl DispatchConfig {
    pub fn from_grid(cfg: &GridConfig) -> Self {
        Self {
            max_workers: cfg.max_workers,
            shutdown_grace: Duration::from_millis(cfg.shutdown_grace_ms),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub workers: usize,
    pub claimed: usize,
    pub completed: usize,
    pub cancelled: bool,
    /// Workers that had to be aborted after the grace period.
    pub aborted: usize,
}

impl DispatchSummary {
    fn absorb(&mut self, report: WorkerReport) {
        self.claimed += report.claimed;
        self.completed += report.completed;
    }
}

pub struct Dispatcher {
    runner: Arc<dyn TaskRunner>,
    bus: Bus,
    cfg: DispatchConfig,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn TaskRunner>, cfg: DispatchConfig) -> Self {
        Self {
            runner,
            bus: Bus::default(),
            cfg,
        }
    }

    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.bus = Bus::new(subscribers);
        self
    }

    /// Spawn the workers, then block until all of them have finished.
    #[instrument(level = "debug", skip_all, fields(runner = self.runner.name()))]
    pub async fn run(
        &self,
        queue: Arc<TaskQueue>,
        cancel: CancellationToken,
    ) -> Result<DispatchSummary, CoreError> {
        let tasks = queue.len();
        let workers = worker_count(tasks, self.cfg.cores, self.cfg.max_workers);
        let mut summary = DispatchSummary {
            workers,
            ..Default::default()
        };

        info!(target: "gridrun.core.dispatch", tasks, workers, cores = self.cfg.cores, "dispatch starting");
        self.bus.publish(
            &Event::new(EventKind::DispatchStarted)
                .with_count(tasks)
                .with_workers(workers),
        );

        let mut set = JoinSet::new();
        for n in 1..=workers {
            let worker = Worker::new(
                WorkerId::new(n),
                Arc::clone(&queue),
                Arc::clone(&self.runner),
                cancel.child_token(),
                self.bus.clone(),
            );
            set.spawn(worker.run());
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                joined = set.join_next() => match joined {
                    Some(res) => absorb(&mut summary, res)?,
                    None => break,
                },
            }
        }

        if summary.cancelled {
            self.bus.publish(&Event::new(EventKind::ShutdownRequested));
            self.drain_with_grace(&mut set, &mut summary).await?;
        }

        debug!(target: "gridrun.core.dispatch", ?summary, "all workers stopped");
        self.bus
            .publish(&Event::new(EventKind::AllStopped).with_count(summary.completed));
        Ok(summary)
    }

    async fn drain_with_grace(
        &self,
        set: &mut JoinSet<WorkerReport>,
        summary: &mut DispatchSummary,
    ) -> Result<(), CoreError> {
        let grace = self.cfg.shutdown_grace;
        let drained = tokio::time::timeout(grace, async {
            while let Some(res) = set.join_next().await {
                absorb(summary, res)?;
            }
            Ok::<(), CoreError>(())
        })
        .await;

        match drained {
            Ok(res) => res,
            Err(_) => {
                summary.aborted = set.len();
                warn!(
                    target: "gridrun.core.dispatch",
                    remaining = summary.aborted,
                    grace_ms = grace.as_millis() as u64,
                    "grace exceeded; aborting workers"
                );
                self.bus.publish(
                    &Event::new(EventKind::GraceExceeded).with_count(summary.aborted),
                );
                set.abort_all();
                while let Some(res) = set.join_next().await {
                    match res {
                        Err(e) if e.is_cancelled() => {}
                        other => absorb(summary, other)?,
                    }
                }
                Ok(())
            }
        }
    }
}

fn absorb(
    summary: &mut DispatchSummary,
    res: Result<WorkerReport, JoinError>,
) -> Result<(), CoreError> {
    let report = res.map_err(|e| CoreError::Join(e.to_string()))?;
    summary.absorb(report);
    Ok(())
}
