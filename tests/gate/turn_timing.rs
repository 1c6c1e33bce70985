use oracle_gate::config::BlockOn;
use oracle_gate::gate::GateState;
use oracle_gate::observability::ObserverEvent;
use oracle_gate::oracle::ReferenceRules;
use oracle_gate::{ConversationSnapshot, GateDecision};

use crate::oracle_harness::{config_for, gate_for, listening, spawn_reference_oracle};

#[tokio::test]
async fn agent_that_already_acted_never_reaches_the_oracle() {
    let (endpoint, shutdown) = spawn_reference_oracle(ReferenceRules::default()).await;
    let fixture = gate_for(&config_for(&endpoint));

    let decision = fixture
        .gate
        .evaluate(&ConversationSnapshot::new("bot?", "utter_greet"))
        .await
        .unwrap();

    assert_eq!(decision, GateDecision::Override("action_listen".into()));
    assert_eq!(fixture.gate.last_state(), GateState::ForceListen);
    assert!(!fixture.client.is_connected().await);
    assert!(
        !fixture
            .observer
            .events()
            .iter()
            .any(|e| matches!(e, ObserverEvent::OracleConnected { .. }))
    );
    shutdown.cancel();
}

#[tokio::test]
async fn custom_listen_action_is_honoured() {
    let (endpoint, shutdown) = spawn_reference_oracle(ReferenceRules::default()).await;
    let mut config = config_for(&endpoint);
    config.gate.listen_action = "wait_for_user".into();
    let fixture = gate_for(&config);

    let forced = fixture.gate.evaluate(&listening("hi")).await.unwrap();
    let queried = fixture
        .gate
        .evaluate(&ConversationSnapshot::new("a bot", "wait_for_user"))
        .await
        .unwrap();

    assert_eq!(forced, GateDecision::Override("wait_for_user".into()));
    assert_eq!(queried, GateDecision::Override("utter_error_message".into()));
    shutdown.cancel();
}

#[tokio::test]
async fn inverted_polarity_blocks_accepted_turns() {
    let (endpoint, shutdown) = spawn_reference_oracle(ReferenceRules::default()).await;
    let mut config = config_for(&endpoint);
    config.gate.block_on = BlockOn::Accepted;
    let fixture = gate_for(&config);

    let human = fixture.gate.evaluate(&listening("hello")).await.unwrap();
    let bot = fixture.gate.evaluate(&listening("bot")).await.unwrap();

    assert_eq!(human, GateDecision::Override("utter_error_message".into()));
    assert_eq!(bot, GateDecision::NoOverride);
    shutdown.cancel();
}

#[tokio::test]
async fn every_turn_is_reported_to_the_observer() {
    let (endpoint, shutdown) = spawn_reference_oracle(ReferenceRules::default()).await;
    let fixture = gate_for(&config_for(&endpoint));

    fixture.gate.evaluate(&listening("hi")).await.unwrap();
    fixture
        .gate
        .evaluate(&ConversationSnapshot::new("hi", "utter_greet"))
        .await
        .unwrap();

    let gated: Vec<String> = fixture
        .observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ObserverEvent::TurnGated { state, .. } => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(gated, vec!["pass".to_string(), "force_listen".to_string()]);
    shutdown.cancel();
}
