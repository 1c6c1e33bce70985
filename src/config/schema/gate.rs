use serde::{Deserialize, Serialize};

/// Which oracle verdict forces the error action.
///
/// Deployments of the verdict service disagree on polarity; `Rejected` is the
/// documented contract, `Accepted` serves services that answer "should block?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockOn {
    #[default]
    Rejected,
    Accepted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Action forced when the oracle blocks a turn
    #[serde(default = "default_error_action")]
    pub error_action: String,
    /// Action that means "the agent is waiting for user input"
    #[serde(default = "default_listen_action")]
    pub listen_action: String,
    #[serde(default)]
    pub block_on: BlockOn,
}

fn default_error_action() -> String {
    "utter_error_message".into()
}

fn default_listen_action() -> String {
    "action_listen".into()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            error_action: default_error_action(),
            listen_action: default_listen_action(),
            block_on: BlockOn::default(),
        }
    }
}
