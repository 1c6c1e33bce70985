//! Field-by-field decomposition of textual event descriptions.
//!
//! Hosts that only keep a printable form of their events render user and bot
//! turns as
//!
//! ```text
//! UserUttered(text: hi, intent: greet, use_text_for_featurization: False)
//! BotUttered(text: Hey!, data: {"elements": null, ...}, metadata: {"utter_action": "utter_greet", ...})
//! ```
//!
//! Labels after `text` are located from the right so free text may contain
//! commas. Any missing label or malformed value yields `None`; callers fall
//! back to an opaque record instead of emitting a partial one.

use crate::conversation::{BotMetadata, BotPayload, BotUttered, UserUttered};
use crate::encoding::tree::payload_text;
use serde_json::{Map, Value};

pub const USER_UTTERED_PREFIX: &str = "UserUttered(";
pub const BOT_UTTERED_PREFIX: &str = "BotUttered(";

const BOT_PAYLOAD_KEYS: [&str; 6] = [
    "elements",
    "quick_replies",
    "buttons",
    "attachment",
    "image",
    "custom",
];

pub fn parse_user_uttered(description: &str) -> Option<UserUttered> {
    let body = call_body(description, USER_UTTERED_PREFIX)?;
    let rest = body.strip_prefix("text: ")?;
    let (rest, flag) = rest.rsplit_once(", use_text_for_featurization: ")?;
    let (text, intent) = rest.rsplit_once(", intent: ")?;

    let intent = intent.trim();
    if intent.is_empty() || intent.chars().any(char::is_whitespace) {
        return None;
    }

    Some(UserUttered {
        text: text.to_string(),
        intent: intent.to_string(),
        use_text_for_featurization: parse_flag(flag)?,
    })
}

pub fn parse_bot_uttered(description: &str) -> Option<BotUttered> {
    let body = call_body(description, BOT_UTTERED_PREFIX)?;
    let rest = body.strip_prefix("text: ")?;
    let (rest, metadata) = rest.rsplit_once(", metadata: ")?;
    let (text, data) = rest.rsplit_once(", data: ")?;

    let data = parse_object(data)?;
    let metadata = parse_object(metadata)?;

    let mut payload = BOT_PAYLOAD_KEYS
        .iter()
        .map(|key| data.get(*key).cloned())
        .collect::<Option<Vec<_>>>()?
        .into_iter();

    Some(BotUttered {
        text: text.to_string(),
        data: BotPayload {
            elements: payload.next()?,
            quick_replies: payload.next()?,
            buttons: payload.next()?,
            attachment: payload.next()?,
            image: payload.next()?,
            custom: payload.next()?,
        },
        metadata: BotMetadata {
            utter_action: metadata_field(&metadata, "utter_action")?,
            model_id: metadata_field(&metadata, "model_id")?,
            assistant_id: metadata_field(&metadata, "assistant_id")?,
        },
    })
}

fn call_body<'a>(description: &'a str, prefix: &str) -> Option<&'a str> {
    description.trim().strip_prefix(prefix)?.strip_suffix(')')
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "True" | "true" => Some(true),
        // An undecided flag is recorded as None by the tracker.
        "False" | "false" | "None" => Some(false),
        _ => None,
    }
}

fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw.trim()).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn metadata_field(metadata: &Map<String, Value>, key: &str) -> Option<String> {
    metadata.get(key).map(payload_text)
}
