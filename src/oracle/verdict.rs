use crate::error::OracleError;
use serde_json::Value;
use std::fmt;

/// The oracle's answer for one turn. Lives for a single query only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn from_bool(accepted: bool) -> Self {
        if accepted {
            Self::Accepted
        } else {
            Self::Rejected
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// Reads a verdict out of a reply payload.
///
/// Two legacy encodings are in the field: a bare word (`True` / `False`, any
/// case, optionally JSON-quoted) and an object carrying a `"verdict"` field.
pub fn parse_reply(reply: &str) -> Result<Verdict, OracleError> {
    let trimmed = reply.trim();

    let marker = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Bool(flag)) => Some(flag),
        Ok(Value::String(word)) => parse_word(&word),
        Ok(Value::Object(map)) => match map.get("verdict") {
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::String(word)) => parse_word(word),
            _ => None,
        },
        Ok(_) => None,
        Err(_) => parse_word(trimmed),
    };

    marker.map(Verdict::from_bool).ok_or_else(|| OracleError::Protocol {
        reply: truncate_for_log(trimmed),
    })
}

fn parse_word(word: &str) -> Option<bool> {
    let word = word.trim();
    if word.eq_ignore_ascii_case("true") {
        Some(true)
    } else if word.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn truncate_for_log(reply: &str) -> String {
    const MAX_CHARS: usize = 120;
    if reply.chars().count() <= MAX_CHARS {
        return reply.to_string();
    }
    let head: String = reply.chars().take(MAX_CHARS).collect();
    format!("{head}…")
}
