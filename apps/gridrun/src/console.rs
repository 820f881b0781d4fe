use gridrun_core::{Event, EventKind, Subscribe};

/// Prints the identity of a worker each time it finishes a task.
pub struct Console;

impl Subscribe for Console {
    fn on_event(&self, event: &Event) {
        if event.kind == EventKind::TaskFinished
            && let Some(worker) = event.worker
        {
            println!("{worker}");
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
