use super::super::{GateConfig, ObservabilityConfig, OracleConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".oracle-gate").join("config.toml"),
            oracle: OracleConfig::default(),
            gate: GateConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Startup checks. A config that fails here must never reach a `TurnGate`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.oracle.endpoint)?;

        if self.oracle.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "oracle.query_timeout_ms must be greater than zero".into(),
            ));
        }

        validate_action_name("gate.error_action", &self.gate.error_action)?;
        validate_action_name("gate.listen_action", &self.gate.listen_action)?;

        if self.gate.error_action.trim() == self.gate.listen_action.trim() {
            return Err(ConfigError::Validation(
                "gate.error_action and gate.listen_action must differ".into(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation(
            "oracle.endpoint must not be empty".into(),
        ));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::Validation(format!("oracle.endpoint '{trimmed}': {e}")))?;

    match parsed.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(ConfigError::Validation(format!(
                "oracle.endpoint scheme must be ws or wss, got '{other}'"
            )));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Validation(format!(
            "oracle.endpoint '{trimmed}' has no host"
        )));
    }

    Ok(())
}

fn validate_action_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} '{value}' must not contain whitespace"
        )));
    }
    Ok(())
}
