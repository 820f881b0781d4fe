//! Run configuration, layered as: defaults, then an optional JSON file, then
//! environment variables.
//!
//! | Env Var                     | Overrides                    |
//! |-----------------------------|------------------------------|
//! | `GRIDRUN_CONFIG`            | path of a JSON `GridConfig`  |
//! | `GRIDRUN_PROGRAM`           | `sim.program`                |
//! | `GRIDRUN_SUBCOMMAND`        | `sim.subcommand`             |
//! | `GRIDRUN_SCENARIO`          | `sim.scenario`               |
//! | `GRIDRUN_DURATION`          | `sim.durationSecs`           |
//! | `GRIDRUN_INFRA`             | `sim.infra`                  |
//! | `GRIDRUN_VERBOSE`           | `sim.verbose`                |
//! | `GRIDRUN_CWD`               | `sim.cwd`                    |
//! | `GRIDRUN_STATIONS`          | `axes.stations` (comma list) |
//! | `GRIDRUN_SEEDS`             | `axes.seeds` (comma list)    |
//! | `GRIDRUN_LOAD_FROM`         | `axes.loads.from`            |
//! | `GRIDRUN_LOAD_TO`           | `axes.loads.to`              |
//! | `GRIDRUN_LOAD_SCALE`        | `axes.loads.scale`           |
//! | `GRIDRUN_MAX_WORKERS`       | `maxWorkers`                 |
//! | `GRIDRUN_QUIET`             | `quiet`                      |
//! | `GRIDRUN_SHUTDOWN_GRACE_MS` | `shutdownGraceMs`            |
//! | `GRIDRUN_LOG_LEVEL`         | logger level (`warn`)        |
//! | `GRIDRUN_LOG_FORMAT`        | `text` / `json` / `journald` |

use std::path::PathBuf;
use std::str::FromStr;

use gridrun_model::{GridConfig, ModelError};
use gridrun_observe::{LoggerConfig, LoggerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ModelError),

    #[error("invalid logger configuration: {0}")]
    Logger(#[from] LoggerError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub logger: LoggerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut grid = match get("GRIDRUN_CONFIG") {
            Some(path) => load_file(PathBuf::from(path))?,
            None => GridConfig::default(),
        };

        let sim = &mut grid.sim;
        if let Some(v) = get("GRIDRUN_PROGRAM") {
            sim.program = v;
        }
        if let Some(v) = get("GRIDRUN_SUBCOMMAND") {
            sim.subcommand = v;
        }
        if let Some(v) = get("GRIDRUN_SCENARIO") {
            sim.scenario = v;
        }
        if let Some(v) = get("GRIDRUN_DURATION") {
            sim.duration_secs = parse_var("GRIDRUN_DURATION", &v)?;
        }
        if let Some(v) = get("GRIDRUN_INFRA") {
            sim.infra = parse_flag("GRIDRUN_INFRA", &v)?;
        }
        if let Some(v) = get("GRIDRUN_VERBOSE") {
            sim.verbose = parse_flag("GRIDRUN_VERBOSE", &v)?;
        }
        if let Some(v) = get("GRIDRUN_CWD") {
            sim.cwd = Some(PathBuf::from(v));
        }

        let axes = &mut grid.axes;
        if let Some(v) = get("GRIDRUN_STATIONS") {
            axes.stations = parse_list("GRIDRUN_STATIONS", &v)?;
        }
        if let Some(v) = get("GRIDRUN_SEEDS") {
            axes.seeds = parse_list("GRIDRUN_SEEDS", &v)?;
        }
        if let Some(v) = get("GRIDRUN_LOAD_FROM") {
            axes.loads.from = parse_var("GRIDRUN_LOAD_FROM", &v)?;
        }
        if let Some(v) = get("GRIDRUN_LOAD_TO") {
            axes.loads.to = parse_var("GRIDRUN_LOAD_TO", &v)?;
        }
        if let Some(v) = get("GRIDRUN_LOAD_SCALE") {
            axes.loads.scale = parse_var("GRIDRUN_LOAD_SCALE", &v)?;
        }

        if let Some(v) = get("GRIDRUN_MAX_WORKERS") {
            grid.max_workers = Some(parse_var("GRIDRUN_MAX_WORKERS", &v)?);
        }
        if let Some(v) = get("GRIDRUN_QUIET") {
            grid.quiet = parse_flag("GRIDRUN_QUIET", &v)?;
        }
        if let Some(v) = get("GRIDRUN_SHUTDOWN_GRACE_MS") {
            grid.shutdown_grace_ms = parse_var("GRIDRUN_SHUTDOWN_GRACE_MS", &v)?;
        }
        grid.validate()?;

        let mut logger = LoggerConfig::default();
        if let Some(v) = get("GRIDRUN_LOG_LEVEL") {
            logger.level = v;
        }
        if let Some(v) = get("GRIDRUN_LOG_FORMAT") {
            logger.format = v.parse()?;
        }

        Ok(Self { grid, logger })
    }
}

fn load_file(path: PathBuf) -> Result<GridConfig, ConfigError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: value.to_string(),
    })
}

/// Comma separated list; an empty string is an empty axis.
fn parse_list<T: FromStr>(var: &'static str, value: &str) -> Result<Vec<T>, ConfigError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value.split(',').map(|part| parse_var(var, part)).collect()
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_variables_gives_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(cfg.grid, GridConfig::default());
        assert_eq!(cfg.logger.level, "warn");
    }

    #[test]
    fn env_overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("GRIDRUN_PROGRAM", "/opt/ns3/ns3"),
            ("GRIDRUN_DURATION", "2.5"),
            ("GRIDRUN_STATIONS", "5, 40"),
            ("GRIDRUN_SEEDS", "7"),
            ("GRIDRUN_LOAD_FROM", "2"),
            ("GRIDRUN_LOAD_TO", "4"),
            ("GRIDRUN_INFRA", "yes"),
            ("GRIDRUN_MAX_WORKERS", "3"),
            ("GRIDRUN_QUIET", "1"),
            ("GRIDRUN_LOG_LEVEL", "debug"),
            ("GRIDRUN_LOG_FORMAT", "json"),
        ]))
        .expect("valid overrides");

        let grid = &cfg.grid;
        assert_eq!(grid.sim.program, "/opt/ns3/ns3");
        assert_eq!(grid.sim.duration_secs, 2.5);
        assert!(grid.sim.infra);
        assert!(!grid.sim.verbose);
        assert_eq!(grid.axes.stations, vec![5, 40]);
        assert_eq!(grid.axes.seeds, vec![7]);
        assert_eq!(grid.axes.task_count(), 2 * 3);
        assert_eq!(grid.max_workers, Some(3));
        assert!(grid.quiet);
        assert_eq!(cfg.logger.level, "debug");
        assert_eq!(cfg.logger.format, gridrun_observe::LoggerFormat::Json);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("GRIDRUN_STATIONS", "5,x")])).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidVar { var: "GRIDRUN_STATIONS", .. }),
            "{err:?}"
        );

        let err = AppConfig::from_lookup(lookup(&[("GRIDRUN_QUIET", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "GRIDRUN_QUIET", .. }));
    }

    #[test]
    fn model_validation_runs_after_overrides() {
        let err = AppConfig::from_lookup(lookup(&[("GRIDRUN_SEEDS", "1,1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ModelError::DuplicateAxisValue { .. })));

        let err = AppConfig::from_lookup(lookup(&[("GRIDRUN_MAX_WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ModelError::ZeroWorkers)));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = AppConfig::from_lookup(lookup(&[(
            "GRIDRUN_CONFIG",
            "/definitely/not/here/gridrun.json",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn config_file_then_env() {
        let path = std::env::temp_dir().join(format!("gridrun-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"axes":{"stations":[5,10],"seeds":[1]},"sim":{"extraArgs":["--useRts=1"]}}"#,
        )
        .expect("write temp config");

        let cfg = AppConfig::from_lookup(lookup(&[
            ("GRIDRUN_CONFIG", path.to_str().expect("utf-8 temp path")),
            ("GRIDRUN_SEEDS", "1,2"),
        ]));
        let _ = std::fs::remove_file(&path);
        let cfg = cfg.expect("valid config");

        assert_eq!(cfg.grid.axes.stations, vec![5, 10]);
        assert_eq!(cfg.grid.axes.seeds, vec![1, 2]);
        assert_eq!(cfg.grid.sim.extra_args, vec!["--useRts=1".to_string()]);
        assert_eq!(cfg.grid.sim.program, "./ns3");
    }
}
