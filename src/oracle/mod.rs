pub mod client;
pub mod reference;
pub mod traits;
pub mod verdict;

pub use client::{MAX_RECONNECTS, WsOracleClient};
pub use reference::{ReferenceRules, ReplyStyle};
pub use traits::{Oracle, OracleFuture};
pub use verdict::{Verdict, parse_reply};
