use std::time::Instant;

use clap::Parser;
use tokio_util::sync::CancellationToken;

/// Port the server listens on when none is configured.
const DEFAULT_PORT: u16 = 8550;

#[derive(Parser, Debug)]
pub struct Args {
    /// port on which the server will listen
    #[arg(
        short = 'p',
        long,
        value_name = "PORT",
        env = "FLET_SERVER_PORT",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    port: Option<u16>,
}

impl Args {
    fn listen_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

pub(super) async fn run(args: Args, shutdown: CancellationToken) -> anyhow::Result<()> {
    let port = args.listen_port();
    let started = Instant::now();

    tracing::info!(message = "Flet server started", port);

    shutdown.cancelled().await;

    tracing::info!(message = "Flet server stopped", uptime = ?started.elapsed());

    Ok(())
}
