use super::Event;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Intent {
    pub name: String,
    pub confidence: f64,
}

/// Conversation state handed over by the host for one turn.
///
/// Built fresh every turn and only ever read by the gate. Slots live in a
/// sorted map so two snapshots with the same content always iterate alike.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ConversationSnapshot {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub entities: Vec<Value>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub slots: BTreeMap<String, Value>,
    pub latest_action_name: String,
}

impl ConversationSnapshot {
    pub fn new(text: impl Into<String>, latest_action_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            latest_action_name: latest_action_name.into(),
            ..Self::default()
        }
    }

    pub fn with_intent(mut self, name: impl Into<String>, confidence: f64) -> Self {
        self.intent = Some(Intent {
            name: name.into(),
            confidence,
        });
        self
    }

    pub fn with_entity(mut self, entity: Value) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: Value) -> Self {
        self.slots.insert(name.into(), value);
        self
    }
}
