use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the gate.
///
/// Oracle failures are not part of it: `TurnGate::evaluate` fails open and
/// records them, so an [`OracleError`] is only seen by callers driving an
/// `Oracle` directly.
#[derive(Debug, Error)]
pub enum GateError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Turn lifecycle ───────────────────────────────────────────────────
    #[error("turn abandoned before a decision was produced")]
    TurnAbandoned,

    #[error("action '{0}' is not in the host's action list")]
    UnknownAction(String),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Oracle errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum OracleError {
    /// Connection refused, reset, closed, or the reply did not arrive in time.
    #[error("oracle {endpoint} transport failed: {message}")]
    Transport { endpoint: String, message: String },

    /// A reply arrived but carries no recognizable verdict marker.
    #[error("oracle reply is not a verdict: {reply}")]
    Protocol { reply: String },

    #[error("canonical message could not be encoded: {0}")]
    Encode(String),
}

impl OracleError {
    pub fn transport(endpoint: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Short label used for logs and observer events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Encode(_) => "encode",
        }
    }
}
