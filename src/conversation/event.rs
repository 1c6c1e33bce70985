use serde::Deserialize;
use serde_json::Value;

/// A user turn as recorded by the host's tracker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserUttered {
    pub text: String,
    pub intent: String,
    pub use_text_for_featurization: bool,
}

/// Display payload attached to a bot turn. Every slot is required; absent
/// content is carried as JSON `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotPayload {
    pub elements: Value,
    pub quick_replies: Value,
    pub buttons: Value,
    pub attachment: Value,
    pub image: Value,
    pub custom: Value,
}

impl Default for BotPayload {
    fn default() -> Self {
        Self {
            elements: Value::Null,
            quick_replies: Value::Null,
            buttons: Value::Null,
            attachment: Value::Null,
            image: Value::Null,
            custom: Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct BotMetadata {
    pub utter_action: String,
    pub model_id: String,
    pub assistant_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BotUttered {
    pub text: String,
    pub data: BotPayload,
    pub metadata: BotMetadata,
}

/// One entry of the conversation history, oldest first in a snapshot.
///
/// Hosts that only expose textual descriptions hand them over as `Other`;
/// the encoder decides whether such a description still decomposes into a
/// user or bot turn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "EventRepr")]
pub enum Event {
    UserUttered(UserUttered),
    BotUttered(BotUttered),
    Other { raw_description: String },
}

impl Event {
    pub fn user(text: impl Into<String>, intent: impl Into<String>, use_text: bool) -> Self {
        Self::UserUttered(UserUttered {
            text: text.into(),
            intent: intent.into(),
            use_text_for_featurization: use_text,
        })
    }

    pub fn bot(text: impl Into<String>, data: BotPayload, metadata: BotMetadata) -> Self {
        Self::BotUttered(BotUttered {
            text: text.into(),
            data,
            metadata,
        })
    }

    pub fn other(raw_description: impl Into<String>) -> Self {
        Self::Other {
            raw_description: raw_description.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum TaggedEvent {
    User(UserUttered),
    Bot(BotUttered),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventRepr {
    Tagged(TaggedEvent),
    Description(String),
    Unrecognized(Value),
}

impl From<EventRepr> for Event {
    fn from(repr: EventRepr) -> Self {
        match repr {
            EventRepr::Tagged(TaggedEvent::User(user)) => Self::UserUttered(user),
            EventRepr::Tagged(TaggedEvent::Bot(bot)) => Self::BotUttered(bot),
            EventRepr::Description(raw_description) => Self::Other { raw_description },
            EventRepr::Unrecognized(value) => Self::Other {
                raw_description: value.to_string(),
            },
        }
    }
}
