pub(super) mod server;

use clap::Subcommand;
use tokio_util::sync::CancellationToken;

#[derive(Subcommand, Debug)]
pub(super) enum Commands {
    /// Start server service
    ///
    /// Server command starts Flet web server.
    Server(server::Args),
}

pub(super) async fn run(command: Commands, shutdown: CancellationToken) -> anyhow::Result<()> {
    match command {
        Commands::Server(args) => server::run(args, shutdown).await,
    }
}
