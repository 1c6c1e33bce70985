use oracle_gate::config::{BlockOn, Config};

pub fn render_status(config: &Config) -> String {
    let block_on = match config.gate.block_on {
        BlockOn::Rejected => "rejected",
        BlockOn::Accepted => "accepted",
    };

    let lines = [
        "◆ oracle-gate status".to_string(),
        String::new(),
        format!("Version:        {}", env!("CARGO_PKG_VERSION")),
        format!("Config:         {}", config.config_path.display()),
        String::new(),
        format!("Oracle:         {}", config.oracle.endpoint),
        format!("Query timeout:  {}ms", config.oracle.query_timeout_ms),
        format!("Error action:   {}", config.gate.error_action),
        format!("Listen action:  {}", config.gate.listen_action),
        format!("Block on:       {block_on}"),
        format!("Observability:  {}", config.observability.backend),
    ];

    lines.join("\n")
}
