use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use questoes_api::{configuration, server::app::run_server, telemetry::init_tracing};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./configuration.{toml,yaml,json} if present)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Port to listen on, overriding the configuration
    #[clap(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = configuration::load(cli.config.as_deref())
        .context("Failed to load configuration (is URL_BD set?)")?;
    if let Some(port) = cli.port {
        settings.application.port = port;
    }

    run_server(settings).await
}
