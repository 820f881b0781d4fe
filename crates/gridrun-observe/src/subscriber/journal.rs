use gridrun_core::{Event, Subscribe};

use crate::subscriber::view::log_event;

/// Forwards every dispatch event to `tracing`.
#[derive(Default)]
pub struct Journal;

impl Journal {
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for Journal {
    fn on_event(&self, event: &Event) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}
