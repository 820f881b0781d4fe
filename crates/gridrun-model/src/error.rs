use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("load denominator must be non-zero")]
    ZeroDenominator,
    #[error("duplicate value {value} on the {axis} axis")]
    DuplicateAxisValue { axis: &'static str, value: String },
    #[error("simulator program is empty")]
    MissingProgram,
    #[error("simulation scenario is empty")]
    EmptyScenario,
    #[error("simulation duration must be a positive finite number, got {0}")]
    InvalidDuration(f64),
    #[error("max workers must be at least 1")]
    ZeroWorkers,
}
