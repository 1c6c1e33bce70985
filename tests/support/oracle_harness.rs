#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use oracle_gate::config::Config;
use oracle_gate::observability::{Observer, ObserverEvent, ObserverMetric};
use oracle_gate::oracle::{ReferenceRules, WsOracleClient, reference};
use oracle_gate::{ConversationSnapshot, Event, TurnGate};

/// Observer that keeps everything it is handed, for assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
    metrics: Mutex<Vec<ObserverMetric>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn oracle_failures(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ObserverEvent::OracleFailure { kind, message, .. } => Some((kind, message)),
                _ => None,
            })
            .collect()
    }

    pub fn reconnects(&self) -> usize {
        self.metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|m| matches!(m, ObserverMetric::OracleReconnect))
            .count()
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        self.metrics.lock().unwrap().push(metric.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Reference verdict service on an ephemeral port. Cancel the token to stop it.
pub async fn spawn_reference_oracle(rules: ReferenceRules) -> (String, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("ws://{}", listener.local_addr().unwrap());
    let shutdown = CancellationToken::new();
    tokio::spawn(reference::serve(listener, rules, shutdown.clone()));
    (endpoint, shutdown)
}

/// Verdict service that answers every frame with the same raw payload.
pub async fn spawn_fixed_oracle(reply: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("ws://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(tcp).await else {
                    return;
                };
                while let Some(Ok(frame)) = ws.next().await {
                    if frame.is_text() && ws.send(Message::Text(reply.into())).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    endpoint
}

/// An endpoint nothing listens on.
pub async fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}")
}

pub fn config_for(endpoint: &str) -> Config {
    let mut config = Config::default();
    config.oracle.endpoint = endpoint.to_string();
    config.oracle.query_timeout_ms = 2_000;
    config
}

pub struct GateFixture {
    pub gate: TurnGate,
    pub client: Arc<WsOracleClient>,
    pub observer: Arc<RecordingObserver>,
}

pub fn gate_for(config: &Config) -> GateFixture {
    let observer = Arc::new(RecordingObserver::default());
    let client = Arc::new(
        WsOracleClient::new(config.oracle.endpoint.clone(), observer.clone()).unwrap(),
    );
    let gate = TurnGate::new(config, client.clone(), observer.clone()).unwrap();
    GateFixture {
        gate,
        client,
        observer,
    }
}

pub fn listening(text: &str) -> ConversationSnapshot {
    ConversationSnapshot::new(text, "action_listen")
}

/// The user asks for help after an earlier greeting; the agent is waiting.
pub fn help_after_greeting() -> ConversationSnapshot {
    listening("help").with_event(Event::user("hi", "greet", true))
}
