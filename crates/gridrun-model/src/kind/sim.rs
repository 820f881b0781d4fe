use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ExecSpec, ModelError, SimTask};

/// How the simulator is launched for a grid point.
///
/// The simulator wrapper receives the scenario and all of its flags as one
/// argument and splits it itself:
///
/// ```text
/// ./ns3 run "scratch/wifi-11b --simulationTime=10.0 --nStas=5 --load=0.1 --seed=1 --infra=0 --verbose=0"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimSpec {
    /// Simulator wrapper binary.
    pub program: String,
    /// Wrapper subcommand placed before the scenario line; empty means none.
    pub subcommand: String,
    /// Scenario to run (first word of the scenario line).
    pub scenario: String,
    /// Simulated time in seconds.
    pub duration_secs: f64,
    /// Infrastructure mode instead of ad-hoc ring.
    pub infra: bool,
    /// Simulator-side verbose logging.
    pub verbose: bool,
    /// Extra scenario flags appended verbatim (e.g. `--useRts=1`, `--queueSize=100`).
    pub extra_args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
}

impl Default for SimSpec {
    fn default() -> Self {
        Self {
            program: "./ns3".to_string(),
            subcommand: "run".to_string(),
            scenario: "scratch/wifi-11b".to_string(),
            duration_secs: 10.0,
            infra: false,
            verbose: false,
            extra_args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }
}

impl SimSpec {
    /// Scenario plus per-task flags, as the single argument handed to the wrapper.
    pub fn scenario_line(&self, task: &SimTask) -> String {
        let mut line = format!(
            "{} --simulationTime={:?} --nStas={} --load={} --seed={} --infra={} --verbose={}",
            self.scenario,
            self.duration_secs,
            task.stations,
            task.load,
            task.seed,
            u8::from(self.infra),
            u8::from(self.verbose),
        );
        for extra in &self.extra_args {
            line.push(' ');
            line.push_str(extra);
        }
        line
    }

    /// Resolve the process invocation for `task`.
    pub fn exec_for(&self, task: &SimTask) -> ExecSpec {
        let mut args = Vec::with_capacity(2);
        if !self.subcommand.is_empty() {
            args.push(self.subcommand.clone());
        }
        args.push(self.scenario_line(task));

        ExecSpec {
            program: self.program.clone(),
            args,
            env: self
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            cwd: self.cwd.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.program.trim().is_empty() {
            return Err(ModelError::MissingProgram);
        }
        if self.scenario.trim().is_empty() {
            return Err(ModelError::EmptyScenario);
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ModelError::InvalidDuration(self.duration_secs));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Load;

    #[test]
    fn default_command_matches_wrapper_shape() {
        let spec = SimSpec::default();
        let task = SimTask::new(0, 5, Load::tenths(1), 1);

        let exec = spec.exec_for(&task);
        assert_eq!(exec.program, "./ns3");
        assert_eq!(
            exec.args,
            vec![
                "run".to_string(),
                "scratch/wifi-11b --simulationTime=10.0 --nStas=5 --load=0.1 --seed=1 --infra=0 --verbose=0"
                    .to_string(),
            ]
        );
        assert!(exec.cwd.is_none());
        assert!(exec.env.is_empty());
    }

    #[test]
    fn integral_load_keeps_fraction_digit() {
        let spec = SimSpec::default();
        let line = spec.scenario_line(&SimTask::new(0, 20, Load::tenths(10), 2));
        assert!(line.contains("--load=1.0 "), "{line}");
        assert!(line.contains("--nStas=20 "), "{line}");
    }

    #[test]
    fn flags_and_extra_args_are_rendered() {
        let spec = SimSpec {
            subcommand: String::new(),
            infra: true,
            verbose: true,
            duration_secs: 2.5,
            extra_args: vec!["--useRts=1".into(), "--queueSize=50".into()],
            ..Default::default()
        };
        let exec = spec.exec_for(&SimTask::new(0, 10, Load::tenths(2), 7));
        assert_eq!(exec.args.len(), 1);
        assert_eq!(
            exec.args[0],
            "scratch/wifi-11b --simulationTime=2.5 --nStas=10 --load=0.2 --seed=7 --infra=1 --verbose=1 --useRts=1 --queueSize=50"
        );
    }

    #[test]
    fn shell_metacharacters_stay_inside_one_argument() {
        let spec = SimSpec {
            scenario: "scratch/x; rm -rf /".into(),
            ..Default::default()
        };
        let exec = spec.exec_for(&SimTask::new(0, 5, Load::tenths(1), 1));
        assert_eq!(exec.args.len(), 2);
        assert!(exec.args[1].starts_with("scratch/x; rm -rf / --simulationTime"));
    }

    #[test]
    fn validation() {
        assert!(SimSpec::default().validate().is_ok());

        let empty = SimSpec {
            program: " ".into(),
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ModelError::MissingProgram));

        let no_scenario = SimSpec {
            scenario: String::new(),
            ..Default::default()
        };
        assert_eq!(no_scenario.validate(), Err(ModelError::EmptyScenario));

        let negative = SimSpec {
            duration_secs: -1.0,
            ..Default::default()
        };
        assert_eq!(negative.validate(), Err(ModelError::InvalidDuration(-1.0)));
    }
}
