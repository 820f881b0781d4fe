use serde::{Deserialize, Serialize};

use crate::{GridAxes, ModelError, SimSpec};

/// Complete run configuration, passed by value to everything that needs it.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub axes: GridAxes,
    pub sim: SimSpec,
    /// Upper bound on workers in addition to the core count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    /// Send simulator stdout/stderr to the null device instead of the terminal.
    pub quiet: bool,
    /// How long cancelled workers get to stop before they are aborted.
    pub shutdown_grace_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            axes: GridAxes::default(),
            sim: SimSpec::default(),
            max_workers: None,
            quiet: false,
            shutdown_grace_ms: 2_000,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.axes.validate()?;
        self.sim.validate()?;
        if self.max_workers == Some(0) {
            return Err(ModelError::ZeroWorkers);
        }
        Ok(())
    }
}
