//! Logging facade used across the workspace.
//!
//! Call sites use the `trace!`, `debug!`, `info!`, `warn!` and `error!` macros exported
//! by this crate; the backend is configured once per process by [`init_logger`].

pub use ::log::{Level, LevelFilter};

mod appender;
mod consts;
mod logger;

use appender::AppenderSpec;
use consts::{DEFAULT_LOGGER_ENV, ERR_LOG_FILE_NAME, LOG_FILE_NAME};
use log4rs::config::{Config, Root};
use logger::Builder;

const CONSOLE_APPENDER: &str = "stdout";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Installs the process-wide logger.
///
/// `filters` is a `RUST_LOG`-like expression such as `info,txpool_mempool=trace`.
/// When `log_dir` is provided, a rolling log file and an error-only rolling log file
/// are written there in addition to the console.
pub fn init_logger(log_dir: Option<&str>, filters: &str) {
    let loggers = Builder::new().root_level(LevelFilter::Info).parse_env(DEFAULT_LOGGER_ENV).parse_expression(filters).build();

    let mut stdout_appender = AppenderSpec::console(CONSOLE_APPENDER, None);
    let mut file_appender = log_dir.and_then(|x| AppenderSpec::roller(LOG_FILE_APPENDER, None, x, LOG_FILE_NAME));
    let mut err_file_appender =
        log_dir.and_then(|x| AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), x, ERR_LOG_FILE_NAME));

    let mut appenders = [Some(&mut stdout_appender), file_appender.as_mut(), err_file_appender.as_mut()];
    let names = appenders.iter().flatten().map(|x| x.name).collect::<Vec<_>>();
    let built = appenders.iter_mut().flatten().filter_map(|x| x.appender()).collect::<Vec<_>>();

    let config = match Config::builder()
        .appenders(built)
        .loggers(loggers.items())
        .build(Root::builder().appenders(names).build(loggers.root_level()))
    {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Logger configuration is invalid: {}", err);
            return;
        }
    };

    if let Err(err) = log4rs::init_config(config) {
        eprintln!("Logger was already initialized: {}", err);
    }
}

/// Tries to init the global logger, but does not panic if it was already setup.
/// Should be used for tests.
pub fn try_init_logger(filters: &str) {
    let loggers = Builder::new().root_level(LevelFilter::Info).parse_expression(filters).build();
    let mut stdout_appender = AppenderSpec::console(CONSOLE_APPENDER, None);
    let Some(appender) = stdout_appender.appender() else {
        return;
    };
    if let Ok(config) = Config::builder()
        .appender(appender)
        .loggers(loggers.items())
        .build(Root::builder().appender(CONSOLE_APPENDER).build(loggers.root_level()))
    {
        let _ = log4rs::init_config(config);
    }
}

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => (
        log::trace!($($t)*)
    )
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => (
        log::debug!($($t)*)
    )
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => (
        log::info!($($t)*)
    )
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => (
        log::warn!($($t)*)
    )
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => (
        log::error!($($t)*)
    )
}
