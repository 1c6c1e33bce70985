use super::Verdict;
use crate::encoding::CanonicalMessage;
use crate::error::OracleError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type OracleFuture<'a> = Pin<Box<dyn Future<Output = Result<Verdict, OracleError>> + Send + 'a>>;

/// Verdict service seam, one implementation per transport
pub trait Oracle: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Address reported in logs and failure events
    fn endpoint(&self) -> &str;

    /// Send one message and wait for exactly one verdict, at most `timeout`.
    fn query<'a>(&'a self, message: &'a CanonicalMessage, timeout: Duration) -> OracleFuture<'a>;
}
