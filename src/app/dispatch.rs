use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use oracle_gate::config::Config;
use oracle_gate::conversation::ConversationSnapshot;
use oracle_gate::encoding::StateSerializer;
use oracle_gate::gate::TurnGate;
use oracle_gate::observability::{self, Observer};
use oracle_gate::oracle::{ReferenceRules, WsOracleClient};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::status::render_status;

fn read_snapshot(path: &Path) -> Result<ConversationSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid snapshot {}", path.display()))
}

fn with_endpoint(mut config: Config, endpoint: Option<String>) -> Result<Config> {
    if let Some(endpoint) = endpoint {
        config.oracle.endpoint = endpoint;
        config.validate().context("Invalid --endpoint")?;
    }
    Ok(config)
}

fn build_client(config: &Config, observer: Arc<dyn Observer>) -> Result<Arc<WsOracleClient>> {
    let client = WsOracleClient::new(config.oracle.endpoint.clone(), observer)
        .context("Failed to create oracle client")?;
    Ok(Arc::new(client))
}

async fn run_decide(config: Config, snapshot_path: &Path, endpoint: Option<String>) -> Result<()> {
    let config = with_endpoint(config, endpoint)?;
    let snapshot = read_snapshot(snapshot_path)?;
    let observer: Arc<dyn Observer> = Arc::from(observability::create_observer(&config.observability));
    let client = build_client(&config, Arc::clone(&observer))?;
    let gate = TurnGate::new(&config, client.clone(), Arc::clone(&observer))?;

    let decision = gate.evaluate(&snapshot).await?;
    client.close().await;
    observer.flush();

    info!(state = %gate.last_state(), "turn evaluated");
    println!("{decision}");
    Ok(())
}

async fn run_probe(config: Config, endpoint: Option<String>, text: String) -> Result<()> {
    let config = with_endpoint(config, endpoint)?;
    let observer: Arc<dyn Observer> = Arc::from(observability::create_observer(&config.observability));
    let client = build_client(&config, observer)?;
    let timeout = config.oracle.query_timeout();

    client
        .connect(timeout)
        .await
        .with_context(|| format!("Oracle {} is unreachable", config.oracle.endpoint))?;

    let snapshot = ConversationSnapshot::new(text, config.gate.listen_action.clone());
    let message = StateSerializer::new().serialize(&snapshot);
    let verdict = client.query_verdict(&message, timeout).await;
    client.close().await;

    let verdict = verdict.context("Oracle did not return a verdict")?;
    println!("{}: {verdict}", config.oracle.endpoint);
    Ok(())
}

async fn run_reference_oracle(host: &str, port: u16, rules: ReferenceRules) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;

    let shutdown = CancellationToken::new();
    let mut server = tokio::spawn(oracle_gate::oracle::reference::serve(
        listener,
        rules,
        shutdown.clone(),
    ));

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for ctrl-c")?;
            info!("shutdown requested");
            shutdown.cancel();
        }
        finished = &mut server => {
            return finished.context("Reference oracle task panicked")?;
        }
    }

    server.await.context("Reference oracle task panicked")?
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serialize { snapshot, pretty } => {
            let snapshot = read_snapshot(&snapshot)?;
            let message = StateSerializer::new().serialize(&snapshot);
            let json = if pretty {
                message.to_json_pretty()
            } else {
                message.to_json()
            }
            .context("Failed to encode canonical message")?;
            println!("{json}");
            Ok(())
        }

        Commands::Decide { snapshot, endpoint } => run_decide(config, &snapshot, endpoint).await,

        Commands::Probe { endpoint, text } => run_probe(config, endpoint, text).await,

        Commands::Status => {
            println!("{}", render_status(&config));
            Ok(())
        }

        Commands::ServeOracle {
            host,
            port,
            block_keyword,
            reply_style,
        } => {
            let rules = ReferenceRules {
                block_keyword,
                reply_style,
            };
            run_reference_oracle(&host, port, rules).await
        }
    }
}
