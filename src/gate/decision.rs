use crate::error::GateError;
use std::fmt;

/// Outcome of one gated turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Leave the host's own prediction untouched.
    NoOverride,
    /// Force the named action with full confidence.
    Override(String),
}

impl GateDecision {
    pub fn forced_action(&self) -> Option<&str> {
        match self {
            Self::NoOverride => None,
            Self::Override(action) => Some(action),
        }
    }

    /// Convert into the host's action-probability vector: every action at
    /// zero except the forced one at 1.0. `None` means the gate abstains.
    pub fn probabilities<S: AsRef<str>>(
        &self,
        action_names: &[S],
    ) -> Result<Option<Vec<f64>>, GateError> {
        let Some(forced) = self.forced_action() else {
            return Ok(None);
        };

        let index = action_names
            .iter()
            .position(|name| name.as_ref() == forced)
            .ok_or_else(|| GateError::UnknownAction(forced.to_string()))?;

        let mut probabilities = vec![0.0; action_names.len()];
        probabilities[index] = 1.0;
        Ok(Some(probabilities))
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOverride => f.write_str("no_override"),
            Self::Override(action) => write!(f, "override:{action}"),
        }
    }
}
