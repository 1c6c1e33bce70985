use std::time::Duration;

/// Events the observer can record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    OracleConnected {
        endpoint: String,
    },
    /// A query ended without a verdict. Recorded once per failed query,
    /// after the retry budget is spent.
    OracleFailure {
        endpoint: String,
        kind: String,
        message: String,
    },
    TurnGated {
        state: String,
        decision: String,
    },
    Error {
        component: String,
        message: String,
    },
}

/// Numeric metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverMetric {
    QueryLatency(Duration),
    OracleReconnect,
}

/// Observability sink, one implementation per backend
pub trait Observer: Send + Sync {
    /// Record a discrete event
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}
