use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use gridrun_core::{RunOutcome, RunnerError, TaskRunner};
use gridrun_model::{SimSpec, SimTask};

use crate::{
    error::{ExecError, ExecResult},
    proc::{StdioPolicy, run_to_completion},
};

/// Launches the network simulator once per grid task.
pub struct SimRunner {
    spec: SimSpec,
    stdio: StdioPolicy,
}

impl SimRunner {
    pub fn new(spec: SimSpec) -> ExecResult<Self> {
        spec.validate()
            .map_err(|e| ExecError::InvalidSpec(e.to_string()))?;
        Ok(Self {
            spec,
            stdio: StdioPolicy::default(),
        })
    }

    pub fn with_stdio(mut self, stdio: StdioPolicy) -> Self {
        self.stdio = stdio;
        self
    }

    pub fn spec(&self) -> &SimSpec {
        &self.spec
    }
}

#[async_trait]
impl TaskRunner for SimRunner {
    fn name(&self) -> &'static str {
        "sim"
    }

    async fn run(
        &self,
        task: &SimTask,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, RunnerError> {
        let exec = self.spec.exec_for(task);
        trace!(target: "gridrun.exec.sim", %task, line = %exec.args.join(" "), "launching simulator");
        Ok(run_to_completion(&exec, self.stdio, cancel).await?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use gridrun_model::Load;

    /// `sh -c "<scenario line>"`: the scenario line arrives as a single argument.
    fn shell_spec(scenario: &str) -> SimSpec {
        SimSpec {
            program: "sh".into(),
            subcommand: "-c".into(),
            scenario: scenario.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn scenario_line_is_one_argument() {
        // Everything after `#` is the flag list, ignored by the shell.
        let runner = SimRunner::new(shell_spec("exit 4 #"))
            .expect("valid spec")
            .with_stdio(StdioPolicy::Null);

        let outcome = runner
            .run(&SimTask::new(0, 5, Load::tenths(1), 1), CancellationToken::new())
            .await
            .expect("run failed");
        assert_eq!(outcome, RunOutcome::Exited { code: Some(4) });
    }

    #[tokio::test]
    async fn flags_reach_the_simulator() {
        // The appended flags become the arguments of `f`.
        let runner = SimRunner::new(shell_spec(
            r#"f() { case "$*" in *"--nStas=20 --load=1.5 --seed=2 --infra=0 --verbose=0") exit 0;; *) exit 9;; esac; }; f"#,
        ))
        .expect("valid spec")
        .with_stdio(StdioPolicy::Null);

        let outcome = runner
            .run(&SimTask::new(0, 20, Load::tenths(15), 2), CancellationToken::new())
            .await
            .expect("run failed");
        assert_eq!(outcome, RunOutcome::Exited { code: Some(0) });
    }

    #[tokio::test]
    async fn spawn_failure_maps_to_runner_error() {
        let spec = SimSpec {
            program: "/definitely/not/ns3".into(),
            ..Default::default()
        };
        let runner = SimRunner::new(spec).expect("valid spec");
        let err = runner
            .run(&SimTask::new(0, 5, Load::tenths(1), 1), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn(_)), "{err:?}");
    }

    #[test]
    fn runner_is_named_after_the_simulator() {
        let runner = SimRunner::new(SimSpec::default()).expect("valid spec");
        assert_eq!(runner.name(), "sim");
        assert_eq!(runner.spec().program, "./ns3");
    }

    #[test]
    fn invalid_spec_is_rejected() {
        let spec = SimSpec {
            duration_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(SimRunner::new(spec), Err(ExecError::InvalidSpec(_))));
    }
}
