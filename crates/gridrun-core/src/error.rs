use gridrun_model::ModelError;
use thiserror::Error;

use crate::runner::RunnerError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ModelError),

    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("worker terminated abnormally: {0}")]
    Join(String),
}
