#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod app;
mod cli;

use cli::commands::Cli;
use oracle_gate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // wss:// endpoints need a process-level CryptoProvider before the first handshake.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_or_init_at(path)?,
        None => Config::load_or_init()?,
    };
    app::dispatch::dispatch(cli, config).await
}
