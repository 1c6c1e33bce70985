pub mod schema;

pub use schema::{BlockOn, Config, GateConfig, ObservabilityConfig, OracleConfig};
pub(crate) use schema::validate_endpoint;
