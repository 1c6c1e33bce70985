#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod conversation;
pub mod encoding;
pub mod error;
pub mod gate;
#[doc(hidden)]
pub mod observability;
pub mod oracle;

pub use config::Config;
pub use conversation::{ConversationSnapshot, Event};
pub use encoding::{CanonicalMessage, EventEncoder, StateSerializer};
pub use error::{ConfigError, GateError, OracleError};
pub use gate::{GateDecision, GateState, TurnGate};
pub use oracle::{Oracle, Verdict, WsOracleClient};
