use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use conduit::cli::Cli;
use conduit::logging::init_tracing;
use conduit::pages::{app, Services};
use conduit::program::Runtime;
use conduit::remote::{FileStore, HttpTransport, RemoteClient, Session};
use conduit::routing::{Location, Router};
use conduit::shell::Shell;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.load_config().context("Failed to load configuration")?;
    tracing::info!(
        base_url = %config.api.base_url,
        token_path = %config.storage.token_path.display(),
        "Starting conduit"
    );

    let transport = HttpTransport::new(
        &config.api.base_url,
        Duration::from_secs(config.api.connect_timeout_seconds.into()),
    )
    .context("Failed to build HTTP client")?;
    let session = Session::new(Arc::new(FileStore::new(config.storage.token_path.clone())));
    let remote = RemoteClient::new(Arc::new(transport), session);
    let router = Router::new(Location::new(cli.initial_fragment()));
    let services = Services::new(remote, router.clone(), config.api.page_size);

    let runtime = Runtime::start(app(services));
    Shell::new(runtime, router)
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Shell I/O failed")?;

    tracing::info!("Shutting down");
    Ok(())
}
