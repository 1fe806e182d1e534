
mod commands;
pub mod logging;

use std::ffi::OsString;
use std::io::Write;

use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;

use logging::{ConfigureLogging, LogLevel};

/// Version string baked into the binary at build time.
///
/// Populated from the `FLET_VERSION` environment variable when set during
/// compilation; untagged builds report `unknown`.
pub const VERSION: &str = match option_env!("FLET_VERSION") {
    Some(version) => version,
    None => "unknown",
};

#[derive(Parser, Debug)]
#[command(name = "flet", about = "Flet")]
pub struct Args {
    /// verbosity level for logs
    #[arg(
        short = 'l',
        long,
        global = true,
        value_name = "LEVEL",
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,

    /// Print version information and exit
    #[arg(long)]
    version: bool,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

/// Snapshot of the process-wide settings resolved from the parsed flags.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub log_level: LogLevel,
}

/// A unit of work the command tree runs after flag parsing and before the
/// selected command's body.
///
/// Stages run in registration order, exactly once per dispatch. A failed
/// stage aborts dispatch and its error reaches the caller unwrapped.
pub trait BeforeDispatch: Send {
    fn apply(&mut self, config: &Config) -> anyhow::Result<()>;
}

/// The `flet` command tree, ready to dispatch a single invocation.
pub struct CommandTree {
    shutdown: CancellationToken,
    stages: Vec<Box<dyn BeforeDispatch>>,
}

impl CommandTree {
    /// The standard tree: logging configuration ahead of dispatch, and the
    /// `server` command wired to the given shutdown handle.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self::with_stages(shutdown, vec![Box::new(ConfigureLogging::default())])
    }

    /// A tree with a caller-supplied stage list in place of the standard one.
    pub fn with_stages(shutdown: CancellationToken, stages: Vec<Box<dyn BeforeDispatch>>) -> Self {
        Self { shutdown, stages }
    }

    /// Appends a stage to run after those already registered.
    pub fn push_stage(&mut self, stage: impl BeforeDispatch + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Dispatches the invocation taken from the process arguments.
    pub async fn dispatch(self) -> anyhow::Result<()> {
        self.dispatch_from(std::env::args_os()).await
    }

    /// Parses `argv` and runs the selected command.
    ///
    /// Version and help requests resolve before any stage runs; parse
    /// errors surface as [`clap::Error`] values inside the returned error.
    pub async fn dispatch_from<I, T>(mut self, argv: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Args::try_parse_from(argv)?;

        if args.version {
            print!("{VERSION}");
            std::io::stdout().flush()?;
            return Ok(());
        }

        let Some(command) = args.command else {
            Args::command().print_long_help()?;
            return Ok(());
        };

        let config = Config {
            log_level: args.log_level,
        };
        for stage in &mut self.stages {
            stage.apply(&config)?;
        }

        commands::run(command, self.shutdown).await
    }
}

/// Entry point used by the binary: dispatches the process arguments against
/// the standard tree, letting parse and help renderings exit through clap.
pub async fn run(shutdown: CancellationToken) -> anyhow::Result<()> {
    match CommandTree::new(shutdown).dispatch().await {
        Err(err) => match err.downcast::<clap::Error>() {
            Ok(parse) => parse.exit(),
            Err(err) => Err(err),
        },
        ok => ok,
    }
}
