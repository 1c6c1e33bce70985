use crate::conversation::ConversationSnapshot;
use crate::encoding::event_encoder::{EventEncoder, EventRecord};
use crate::encoding::tree::{Node, payload_text, slot_text};
use serde::{Serialize, Serializer};

/// Top-level keys of every canonical message, in wire order.
pub const MESSAGE_KEYS: [&str; 6] = [
    "text",
    "intent",
    "entities",
    "events",
    "slots",
    "latest_action_name",
];

/// One serialized turn snapshot, ready for the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMessage {
    root: Node,
    event_records: usize,
}

impl CanonicalMessage {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn event_count(&self) -> usize {
        self.event_records
    }

    /// Wire form: compact JSON, byte-identical for identical snapshots.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.root)
    }

    /// Indented form for humans (CLI output, debugging).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }
}

impl Serialize for CanonicalMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StateSerializer {
    encoder: EventEncoder,
}

impl StateSerializer {
    pub fn new() -> Self {
        Self {
            encoder: EventEncoder::new(),
        }
    }

    pub fn serialize(&self, snapshot: &ConversationSnapshot) -> CanonicalMessage {
        let records = self.encoder.encode_all(&snapshot.events);
        let fallbacks = records.iter().filter(|record| record.fallback).count();
        if fallbacks > 0 {
            tracing::debug!(fallbacks, "events encoded as opaque records");
        }
        let event_records = records.len();

        let root = Node::map([
            ("text", Node::text(&snapshot.text)),
            ("intent", intent_node(snapshot)),
            ("entities", entities_node(snapshot)),
            ("events", events_node(records)),
            ("slots", slots_node(snapshot)),
            ("latest_action_name", Node::text(&snapshot.latest_action_name)),
        ]);

        CanonicalMessage {
            root,
            event_records,
        }
    }
}

fn intent_node(snapshot: &ConversationSnapshot) -> Node {
    snapshot.intent.as_ref().map_or(Node::Null, |intent| {
        Node::map([
            ("name", Node::text(&intent.name)),
            ("confidence", Node::float(intent.confidence)),
        ])
    })
}

fn entities_node(snapshot: &ConversationSnapshot) -> Node {
    Node::List(
        snapshot
            .entities
            .iter()
            .map(|entity| Node::text(payload_text(entity)))
            .collect(),
    )
}

fn events_node(records: Vec<EventRecord>) -> Node {
    Node::Map(
        records
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect(),
    )
}

fn slots_node(snapshot: &ConversationSnapshot) -> Node {
    Node::Map(
        snapshot
            .slots
            .iter()
            .map(|(name, value)| (name.clone(), Node::text(slot_text(value))))
            .collect(),
    )
}
