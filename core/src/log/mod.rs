//! Logger and logging macros
//!
//! The macros forward to the `log` facade so that every crate in the workspace logs through
//! `czz_core::info!(...)` and friends, while [`init_logger`] wires the facade to `log4rs` appenders.

use log::{Level, LevelFilter};
use log4rs::{config::Root, Config, Handle};
use std::sync::OnceLock;

mod appender;
mod consts;
mod logger;

pub use consts::{DEFAULT_LOGGER_ENV, ERR_LOG_FILE_NAME, LOG_FILE_NAME};
pub use logger::LogError;

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => {
        log::trace!($($t)*);
    };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        log::debug!($($t)*);
    };
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        log::info!($($t)*);
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        log::warn!($($t)*);
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        log::error!($($t)*);
    };
}

static LOGGER_HANDLE: OnceLock<Handle> = OnceLock::new();

const CONSOLE_APPENDER: &str = "stdout";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Builds the `log4rs` configuration described by `filters` (a `level,module=level,...` expression,
/// appended to the content of the `RUST_LOG` environment variable).
///
/// When `log_dir` is provided, log lines are also written to a rolling log file and errors to a
/// dedicated error log file in that directory.
pub fn build_config(log_dir: Option<&str>, filters: &str) -> Result<Config, LogError> {
    let mut appenders = vec![appender::AppenderSpec::console(CONSOLE_APPENDER, None)];
    if let Some(log_dir) = log_dir {
        appenders.push(appender::AppenderSpec::roller(LOG_FILE_APPENDER, None, log_dir, LOG_FILE_NAME)?);
        appenders.push(appender::AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), log_dir, ERR_LOG_FILE_NAME)?);
    }

    let loggers = logger::Builder::new()
        .root_level(LevelFilter::Info)
        .parse_env(DEFAULT_LOGGER_ENV)
        .parse_expression(filters)
        .build();

    let root_appenders = appenders.iter().map(|x| x.name).collect::<Vec<_>>();
    Config::builder()
        .appenders(appenders.iter_mut().map(|x| x.appender()))
        .loggers(loggers.items())
        .build(Root::builder().appenders(root_appenders).build(loggers.root_level()))
        .map_err(|err| LogError::ConfigError(err.to_string()))
}

/// Initializes the global logger. Only the first call has an effect, later calls are ignored.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), LogError> {
    if LOGGER_HANDLE.get().is_some() {
        return Ok(());
    }
    let config = build_config(log_dir, filters)?;
    let handle = log4rs::init_config(config).map_err(|err| LogError::ConfigError(err.to_string()))?;
    let _ = LOGGER_HANDLE.set(handle);
    Ok(())
}

/// Tries to init the global logger, but does not panic if it was already setup.
/// Should be used for tests.
pub fn try_init_logger(filters: &str) {
    let _ = init_logger(None, filters);
}

/// Returns true if logs of `level` would currently be emitted by the global logger
pub fn log_level_enabled(level: Level) -> bool {
    log::max_level() >= level.to_level_filter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_without_files() {
        let config = build_config(None, "debug,czz_consensus=trace").unwrap();
        assert_eq!(config.appenders().len(), 1);
        assert_eq!(config.root().level(), LevelFilter::Debug);
        let consensus = config.loggers().iter().find(|l| l.name() == "czz_consensus").unwrap();
        assert_eq!(consensus.level(), LevelFilter::Trace);
    }

    #[test]
    fn test_build_config_with_files() {
        let dir = std::env::temp_dir().join("czz-core-log-test");
        let config = build_config(dir.to_str(), "warn").unwrap();
        assert_eq!(config.appenders().len(), 3);
        assert_eq!(config.root().level(), LevelFilter::Warn);
    }
}
