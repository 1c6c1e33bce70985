use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// WebSocket address of the verdict service (default: ws://localhost:5002)
    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,
    /// Max wait per query, connect included (default: 5000)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

fn default_oracle_endpoint() -> String {
    "ws://localhost:5002".into()
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

impl OracleConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_oracle_endpoint(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}
