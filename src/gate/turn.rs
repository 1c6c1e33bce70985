use super::decision::GateDecision;
use crate::config::{BlockOn, Config, GateConfig};
use crate::conversation::ConversationSnapshot;
use crate::encoding::StateSerializer;
use crate::error::{ConfigError, GateError, OracleError};
use crate::observability::{Observer, ObserverEvent, ObserverMetric};
use crate::oracle::{Oracle, Verdict};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Phase of the per-turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    ForceListen,
    Querying,
    Blocked,
    Pass,
}

impl GateState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ForceListen => "force_listen",
            Self::Querying => "querying",
            Self::Blocked => "blocked",
            Self::Pass => "pass",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ForceListen | Self::Blocked | Self::Pass)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-turn policy that decides whether the host may act on its own
/// prediction.
///
/// Turns are evaluated strictly in order: `evaluate` holds the turn lock until
/// its decision is produced. Oracle trouble never blocks the conversation; the
/// gate fails open and records the failure on the observer.
pub struct TurnGate {
    settings: GateConfig,
    query_timeout: Duration,
    serializer: StateSerializer,
    oracle: Arc<dyn Oracle>,
    observer: Arc<dyn Observer>,
    turn_lock: tokio::sync::Mutex<()>,
    cancel: Mutex<CancellationToken>,
    state: Mutex<GateState>,
    last_state: Mutex<GateState>,
}

impl TurnGate {
    pub fn new(
        config: &Config,
        oracle: Arc<dyn Oracle>,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            settings: config.gate.clone(),
            query_timeout: config.oracle.query_timeout(),
            serializer: StateSerializer::new(),
            oracle,
            observer,
            turn_lock: tokio::sync::Mutex::new(()),
            cancel: Mutex::new(CancellationToken::new()),
            state: Mutex::new(GateState::Idle),
            last_state: Mutex::new(GateState::Idle),
        })
    }

    /// Current phase. `Querying` while an oracle call is in flight.
    pub fn state(&self) -> GateState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Terminal phase of the most recent finished turn.
    pub fn last_state(&self) -> GateState {
        *self.last_state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Abandon the in-flight turn. Its `evaluate` returns
    /// [`GateError::TurnAbandoned`] and the pending oracle call is dropped.
    /// Turns queued behind it are unaffected.
    pub fn reset(&self) {
        let mut cancel = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        cancel.cancel();
        *cancel = CancellationToken::new();
    }

    pub async fn evaluate(
        &self,
        snapshot: &ConversationSnapshot,
    ) -> Result<GateDecision, GateError> {
        let _turn = self.turn_lock.lock().await;
        let cancel = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if snapshot.latest_action_name != self.settings.listen_action {
            tracing::debug!(
                latest_action = %snapshot.latest_action_name,
                "agent already acted this turn, forcing listen"
            );
            return Ok(self.finish(
                GateState::ForceListen,
                GateDecision::Override(self.settings.listen_action.clone()),
            ));
        }

        self.set_state(GateState::Querying);
        let _idle = IdleOnDrop(&self.state);
        let message = self.serializer.serialize(snapshot);
        let started = Instant::now();

        let outcome = tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("turn abandoned while querying oracle");
                return Err(GateError::TurnAbandoned);
            }
            outcome = tokio::time::timeout(
                self.query_timeout,
                self.oracle.query(&message, self.query_timeout),
            ) => outcome,
        };

        self.observer
            .record_metric(&ObserverMetric::QueryLatency(started.elapsed()));

        let verdict = outcome.unwrap_or_else(|_| {
            Err(OracleError::transport(
                self.oracle.endpoint(),
                format!("no verdict within {}ms", self.query_timeout.as_millis()),
            ))
        });

        let decision = match verdict {
            Ok(verdict) if self.blocks(verdict) => self.finish(
                GateState::Blocked,
                GateDecision::Override(self.settings.error_action.clone()),
            ),
            Ok(_) => self.finish(GateState::Pass, GateDecision::NoOverride),
            Err(error) => {
                self.record_failure(&error);
                self.finish(GateState::Pass, GateDecision::NoOverride)
            }
        };
        Ok(decision)
    }

    fn blocks(&self, verdict: Verdict) -> bool {
        match self.settings.block_on {
            BlockOn::Rejected => verdict == Verdict::Rejected,
            BlockOn::Accepted => verdict == Verdict::Accepted,
        }
    }

    fn record_failure(&self, error: &OracleError) {
        tracing::debug!(
            oracle = self.oracle.name(),
            kind = error.kind(),
            "oracle query failed, letting the turn through: {error}"
        );

        let event = match error {
            OracleError::Encode(message) => ObserverEvent::Error {
                component: "encoding".into(),
                message: message.clone(),
            },
            _ => ObserverEvent::OracleFailure {
                endpoint: self.oracle.endpoint().to_string(),
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
        };
        self.observer.record_event(&event);
    }

    fn finish(&self, terminal: GateState, decision: GateDecision) -> GateDecision {
        *self.last_state.lock().unwrap_or_else(PoisonError::into_inner) = terminal;
        self.set_state(GateState::Idle);

        self.observer.record_event(&ObserverEvent::TurnGated {
            state: terminal.as_str().to_string(),
            decision: decision.to_string(),
        });
        decision
    }

    fn set_state(&self, state: GateState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Returns the gate to `Idle` however the querying phase ends, including
/// when the host drops the `evaluate` future mid-query.
struct IdleOnDrop<'a>(&'a Mutex<GateState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = GateState::Idle;
    }
}
