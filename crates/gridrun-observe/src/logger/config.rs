use crate::logger::format::LoggerFormat;

/// Where diagnostics go and how much of them. ANSI colour follows whether stderr is a terminal.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directives, e.g. `warn` or `warn,gridrun.task=debug`.
    pub level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "warn".to_string(),
        }
    }
}
