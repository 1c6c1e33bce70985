pub mod event;
pub mod snapshot;

pub use event::{BotMetadata, BotPayload, BotUttered, Event, UserUttered};
pub use snapshot::{ConversationSnapshot, Intent};
