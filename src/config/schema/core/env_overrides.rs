use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("ORACLE_GATE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.oracle.endpoint = endpoint;
        }

        if let Ok(timeout_str) = std::env::var("ORACLE_GATE_TIMEOUT_MS")
            && let Ok(timeout_ms) = timeout_str.parse::<u64>()
            && timeout_ms > 0
        {
            self.oracle.query_timeout_ms = timeout_ms;
        }

        if let Ok(action) = std::env::var("ORACLE_GATE_ERROR_ACTION")
            && !action.is_empty()
        {
            self.gate.error_action = action;
        }

        if let Ok(action) = std::env::var("ORACLE_GATE_LISTEN_ACTION")
            && !action.is_empty()
        {
            self.gate.listen_action = action;
        }
    }
}
