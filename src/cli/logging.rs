use super::{BeforeDispatch, Config};

use clap::ValueEnum;
use std::fmt::Display;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::Layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding additional filter directives.
///
/// When set, its directives take precedence over the `--log-level` flag.
pub const LOG_ENV: &str = "FLET_LOG";

/// Verbosity accepted by the `--log-level` flag.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    let log_level: LevelFilter = level.into();

    EnvFilter::builder()
        .with_default_directive(log_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Installs the process-global subscriber at the given base level.
///
/// Returns the guard keeping the non-blocking writer alive; dropping it
/// flushes any buffered records.
pub fn init_global_subscriber(level: LogLevel) -> WorkerGuard {
    let filter = env_filter(level);

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    use std::io::IsTerminal;
    let fmt = if std::io::stderr().is_terminal() {
        fmt::layer()
            .without_time()
            .with_writer(non_blocking)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .json()
            .with_writer(non_blocking)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt)
        .with(filter)
        .with(ErrorLayer::default())
        .init();

    guard
}

/// Stage that configures logging from the resolved settings.
///
/// Holds the writer guard for the remainder of dispatch. Must run at most
/// once per process; a second run trips the subscriber registry.
#[derive(Default)]
pub struct ConfigureLogging {
    _guard: Option<WorkerGuard>,
}

impl BeforeDispatch for ConfigureLogging {
    fn apply(&mut self, config: &Config) -> anyhow::Result<()> {
        self._guard = Some(init_global_subscriber(config.log_level));
        Ok(())
    }
}
