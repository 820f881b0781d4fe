//! Process-wide `tracing` setup.
//!
//! Diagnostics always go to stderr (or the journal) so stdout carries only the
//! run's own console lines.
mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Install the global subscriber described by `cfg`. Fails if one is already set.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
