use clap::{Parser, Subcommand};
use oracle_gate::oracle::ReplyStyle;
use std::path::PathBuf;

/// `oracle-gate` - Oracle-backed turn gate for dialogue engines.
#[derive(Parser, Debug)]
#[command(name = "oracle-gate")]
#[command(version)]
#[command(about = "Gate dialogue turns on an external verdict service.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.oracle-gate/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the canonical message for a conversation snapshot
    Serialize {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Pretty-print the message
        #[arg(long)]
        pretty: bool,
    },

    /// Run one gated turn against the oracle and print the decision
    Decide {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Oracle endpoint (overrides config)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Check that the oracle is reachable and answers
    Probe {
        /// Oracle endpoint (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// User text sent with the probe turn
        #[arg(long, default_value = "ping")]
        text: String,
    },

    /// Show the effective configuration
    Status,

    /// Run the bundled reference verdict service
    ServeOracle {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on (use 0 for random available port)
        #[arg(short, long, default_value = "5002")]
        port: u16,

        /// Reject turns whose text contains this keyword
        #[arg(long, default_value = "bot")]
        block_keyword: String,

        /// Verdict encoding on the wire
        #[arg(long, value_enum, default_value_t = ReplyStyle::Word)]
        reply_style: ReplyStyle,
    },
}
