use crate::conversation::{BotUttered, Event, UserUttered};
use crate::encoding::textual::{
    BOT_UTTERED_PREFIX, USER_UTTERED_PREFIX, parse_bot_uttered, parse_user_uttered,
};
use crate::encoding::tree::{Node, flag_text, payload_text};

/// Marker value carried by every opaque record.
pub const OTHER_RECORD_VALUE: &str = "NULL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    UserUttered,
    BotUttered,
    Other,
}

/// One encoded history entry: a key in the message's `events` object and the
/// value stored under it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub shape: RecordShape,
    pub key: String,
    pub value: Node,
    /// Set when a user/bot description failed to decompose.
    pub fallback: bool,
}

/// Stateless event-to-record encoder. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventEncoder;

impl EventEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, event: &Event) -> EventRecord {
        match event {
            Event::UserUttered(user) => user_record(user),
            Event::BotUttered(bot) => bot_record(bot),
            Event::Other { raw_description } => encode_description(raw_description),
        }
    }

    pub fn encode_all<'a>(&self, events: impl IntoIterator<Item = &'a Event>) -> Vec<EventRecord> {
        events.into_iter().map(|event| self.encode(event)).collect()
    }
}

fn encode_description(raw: &str) -> EventRecord {
    let trimmed = raw.trim_start();

    if trimmed.starts_with(USER_UTTERED_PREFIX) {
        if let Some(user) = parse_user_uttered(raw) {
            return user_record(&user);
        }
        tracing::debug!(shape = "UserUttered", "event description did not decompose");
        return other_record(raw, true);
    }

    if trimmed.starts_with(BOT_UTTERED_PREFIX) {
        if let Some(bot) = parse_bot_uttered(raw) {
            return bot_record(&bot);
        }
        tracing::debug!(shape = "BotUttered", "event description did not decompose");
        return other_record(raw, true);
    }

    other_record(raw, false)
}

fn user_record(user: &UserUttered) -> EventRecord {
    EventRecord {
        shape: RecordShape::UserUttered,
        key: "UserUttered".into(),
        value: Node::map([
            ("text", Node::text(&user.text)),
            ("intent", Node::text(&user.intent)),
            (
                "use_text_for_featurization",
                Node::text(flag_text(user.use_text_for_featurization)),
            ),
        ]),
        fallback: false,
    }
}

fn bot_record(bot: &BotUttered) -> EventRecord {
    let data = &bot.data;
    let metadata = &bot.metadata;

    EventRecord {
        shape: RecordShape::BotUttered,
        key: "BotUttered".into(),
        value: Node::map([
            ("text", Node::text(&bot.text)),
            (
                "data",
                Node::map([
                    ("elements", Node::text(payload_text(&data.elements))),
                    ("quick_replies", Node::text(payload_text(&data.quick_replies))),
                    ("buttons", Node::text(payload_text(&data.buttons))),
                    ("attachment", Node::text(payload_text(&data.attachment))),
                    ("image", Node::text(payload_text(&data.image))),
                    ("custom", Node::text(payload_text(&data.custom))),
                ]),
            ),
            (
                "metadata",
                Node::map([
                    ("utter_action", Node::text(&metadata.utter_action)),
                    ("model_id", Node::text(&metadata.model_id)),
                    ("assistant_id", Node::text(&metadata.assistant_id)),
                ]),
            ),
        ]),
        fallback: false,
    }
}

fn other_record(raw: &str, fallback: bool) -> EventRecord {
    EventRecord {
        shape: RecordShape::Other,
        key: sanitize_description(raw),
        value: Node::text(OTHER_RECORD_VALUE),
        fallback,
    }
}

/// Upper-cases the description and swaps the separators the original wire
/// format reserved (`:` and `,`) for `=` and `;`.
pub fn sanitize_description(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .map(|c| match c {
            ':' => '=',
            ',' => ';',
            other => other,
        })
        .collect()
}
