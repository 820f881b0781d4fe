use gridrun_core::RunnerError;
use thiserror::Error;

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("missing program")]
    MissingProgram,
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("wait failed: {0}")]
    Wait(String),
}

impl From<ExecError> for RunnerError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::MissingProgram => RunnerError::InvalidSpec("missing program".into()),
            ExecError::InvalidSpec(msg) => RunnerError::InvalidSpec(msg),
            ExecError::Spawn(msg) => RunnerError::Spawn(msg),
            ExecError::Wait(msg) => RunnerError::Wait(msg),
        }
    }
}
