mod core;
mod gate;
mod observability;
mod oracle;

pub use core::Config;
pub(crate) use core::validate_endpoint;
pub use gate::{BlockOn, GateConfig};
pub use observability::ObservabilityConfig;
pub use oracle::OracleConfig;
