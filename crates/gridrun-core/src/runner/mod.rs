use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use gridrun_model::SimTask;

/// How a single run ended, as far as the dispatcher cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The command ran to completion. `code` is `None` when it died by signal.
    Exited { code: Option<i32> },
    /// The run was interrupted through the cancellation token.
    Cancelled,
}

impl RunOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited { code: Some(0) })
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("wait failed: {0}")]
    Wait(String),
}

/// Executes one grid task.
///
/// Implementations must return promptly with [`RunOutcome::Cancelled`] once
/// `cancel` fires. A failing command is an `Ok(Exited { .. })`, not an error:
/// errors are reserved for runs that could not be attempted at all.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(
        &self,
        task: &SimTask,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, RunnerError>;
}
