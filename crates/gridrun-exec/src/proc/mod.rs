//! Run one external process to completion, or until cancelled.
//!
//! The exit status is handed back as a [`RunOutcome`] and never turned into
//! an error: a simulator that exits non-zero still counts as a finished run.
use std::process::Stdio;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use gridrun_core::RunOutcome;
use gridrun_model::ExecSpec;

use crate::{
    error::{ExecError, ExecResult},
    util::{cmd_program, kill_graceful},
};

/// Where the child's stdout/stderr go. stdin is always the null device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdioPolicy {
    /// Share the parent's terminal.
    #[default]
    Inherit,
    /// Discard all output.
    Null,
}

impl StdioPolicy {
    pub fn quiet(quiet: bool) -> Self {
        if quiet {
            StdioPolicy::Null
        } else {
            StdioPolicy::Inherit
        }
    }

    fn apply(self, cmd: &mut tokio::process::Command) {
        cmd.stdin(Stdio::null());
        match self {
            StdioPolicy::Inherit => {
                cmd.stdout(Stdio::inherit());
                cmd.stderr(Stdio::inherit());
            }
            StdioPolicy::Null => {
                cmd.stdout(Stdio::null());
                cmd.stderr(Stdio::null());
            }
        }
    }
}

pub async fn run_to_completion(
    spec: &ExecSpec,
    stdio: StdioPolicy,
    cancel: CancellationToken,
) -> ExecResult<RunOutcome> {
    if spec.program.trim().is_empty() {
        return Err(ExecError::MissingProgram);
    }
    if cancel.is_cancelled() {
        return Ok(RunOutcome::Cancelled);
    }

    let mut cmd = cmd_program(spec);
    stdio.apply(&mut cmd);
    cmd.kill_on_drop(true);

    trace!(target: "gridrun.exec.proc", program = %spec.program, args = ?spec.args, "spawn");
    let mut child = cmd
        .spawn()
        .map_err(|e| ExecError::Spawn(format!("{}: {e}", spec.program)))?;

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| ExecError::Wait(e.to_string()))?;
            match status.code() {
                Some(code) => debug!(target: "gridrun.exec.proc", code, "exited"),
                None => debug!(target: "gridrun.exec.proc", "terminated by signal"),
            }
            Ok(RunOutcome::Exited { code: status.code() })
        }
        _ = cancel.cancelled() => {
            debug!(target: "gridrun.exec.proc", "cancelled; killing child");
            let _ = kill_graceful(&mut child).await;
            Ok(RunOutcome::Cancelled)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn sh(script: &str) -> ExecSpec {
        ExecSpec::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn exit_status_is_an_outcome_not_an_error() {
        let ok = run_to_completion(&sh("exit 0"), StdioPolicy::Null, CancellationToken::new())
            .await
            .expect("run failed");
        assert_eq!(ok, RunOutcome::Exited { code: Some(0) });

        let failed = run_to_completion(&sh("exit 3"), StdioPolicy::Null, CancellationToken::new())
            .await
            .expect("non-zero exit must not be an error");
        assert_eq!(failed, RunOutcome::Exited { code: Some(3) });
    }

    #[tokio::test]
    async fn env_and_cwd_are_applied() {
        let mut spec = sh(r#"test "$GRIDRUN_PROBE" = ok && test "$(pwd)" = /"#);
        spec.env.push(("GRIDRUN_PROBE".into(), "ok".into()));
        spec.cwd = Some("/".into());

        let outcome = run_to_completion(&spec, StdioPolicy::Null, CancellationToken::new())
            .await
            .expect("run failed");
        assert_eq!(outcome, RunOutcome::Exited { code: Some(0) });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancellation_kills_running_child() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let outcome = tokio::time::timeout(
            Duration::from_secs(10),
            run_to_completion(&sh("sleep 30"), StdioPolicy::Null, cancel),
        )
        .await
        .expect("child was not killed")
        .expect("run failed");

        assert_eq!(outcome, RunOutcome::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn already_cancelled_does_not_spawn() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = run_to_completion(
            &ExecSpec::new("/definitely/not/here"),
            StdioPolicy::Null,
            cancel,
        )
        .await
        .expect("run failed");
        assert_eq!(outcome, RunOutcome::Cancelled);
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let err = run_to_completion(
            &ExecSpec::new("/definitely/not/here"),
            StdioPolicy::Null,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExecError::Spawn(_)), "{err:?}");
    }

    #[tokio::test]
    async fn empty_program_is_rejected() {
        let err = run_to_completion(&ExecSpec::new(""), StdioPolicy::Null, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::MissingProgram));
    }

    #[test]
    fn quiet_maps_to_null() {
        assert_eq!(StdioPolicy::quiet(true), StdioPolicy::Null);
        assert_eq!(StdioPolicy::quiet(false), StdioPolicy::Inherit);
    }
}
