use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?} (expected one of: text, json, journald)")]
    InvalidFormat(String),
    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("cannot connect to journald: {0}")]
    JournaldUnavailable(String),
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("invalid log filter {0:?}")]
    InvalidLogLevel(String),
}
