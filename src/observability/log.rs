use super::traits::{Observer, ObserverEvent, ObserverMetric};
use tracing::{info, warn};

/// Observer that forwards events to `tracing`
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::OracleConnected { endpoint } => {
                info!(endpoint = %endpoint, "oracle.connected");
            }
            ObserverEvent::OracleFailure {
                endpoint,
                kind,
                message,
            } => {
                warn!(endpoint = %endpoint, kind = %kind, error = %message, "oracle.failure");
            }
            ObserverEvent::TurnGated { state, decision } => {
                info!(state = %state, decision = %decision, "gate.turn");
            }
            ObserverEvent::Error { component, message } => {
                warn!(component = %component, error = %message, "error");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::QueryLatency(d) => {
                let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
                info!(latency_ms = ms, "metric.query_latency");
            }
            ObserverMetric::OracleReconnect => {
                info!("metric.oracle_reconnect");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
