pub mod event_encoder;
pub mod serializer;
pub mod textual;
pub mod tree;

pub use event_encoder::{EventEncoder, EventRecord, RecordShape};
pub use serializer::{CanonicalMessage, MESSAGE_KEYS, StateSerializer};
pub use tree::Node;
