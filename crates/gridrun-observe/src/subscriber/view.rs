use gridrun_core::{Event, EventKind};
use tracing::{debug, info, trace, warn};

#[inline]
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        // dispatcher
        EventKind::DispatchStarted => "dispatch started",
        EventKind::ShutdownRequested => "shutdown requested; stopping workers",
        EventKind::GraceExceeded => "grace exceeded; some workers did not stop in time",
        EventKind::AllStopped => "all workers stopped",

        // worker
        EventKind::WorkerStarted => "worker started",
        EventKind::WorkerDone => "worker done (queue drained or cancelled)",

        // task
        EventKind::TaskStarting => "task is starting",
        EventKind::TaskFinished => "task finished",
        EventKind::TaskFailed => "task could not be run",
    }
}

pub fn log_event(e: &Event) {
    let msg = message_for(e.kind);
    let worker = e.worker.map(|w| w.to_string()).unwrap_or_default();
    let task = e.task.map(|t| t.to_string()).unwrap_or_default();
    let reason = e.reason.as_deref().unwrap_or("unknown");

    match e.kind {
        EventKind::DispatchStarted => {
            info!(target: "gridrun.dispatch", tasks = e.count.unwrap_or(0), workers = e.workers.unwrap_or(0), "{msg}")
        }
        EventKind::ShutdownRequested => info!(target: "gridrun.dispatch", "{msg}"),
        EventKind::GraceExceeded => {
            warn!(target: "gridrun.dispatch", aborted = e.count.unwrap_or(0), "{msg}")
        }
        EventKind::AllStopped => {
            info!(target: "gridrun.dispatch", completed = e.count.unwrap_or(0), "{msg}")
        }

        EventKind::WorkerStarted => trace!(target: "gridrun.worker", %worker, "{msg}"),
        EventKind::WorkerDone => {
            debug!(target: "gridrun.worker", %worker, completed = e.count.unwrap_or(0), "{msg}")
        }

        EventKind::TaskStarting => debug!(target: "gridrun.task", %worker, %task, "{msg}"),
        EventKind::TaskFinished => match e.exit_code {
            Some(0) => debug!(target: "gridrun.task", %worker, %task, "{msg}"),
            Some(code) => info!(target: "gridrun.task", %worker, %task, code, "{msg} with non-zero exit"),
            None => info!(target: "gridrun.task", %worker, %task, "{msg} without exit code"),
        },
        EventKind::TaskFailed => warn!(target: "gridrun.task", %worker, %task, reason, "{msg}"),
    }
}
