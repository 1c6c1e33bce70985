use std::time::Duration;

use oracle_gate::GateDecision;
use oracle_gate::gate::GateState;
use oracle_gate::oracle::{ReferenceRules, ReplyStyle};

use crate::oracle_harness::{
    config_for, gate_for, help_after_greeting, listening, spawn_fixed_oracle,
    spawn_reference_oracle, unreachable_endpoint,
};

#[tokio::test]
async fn negative_verdict_forces_error_action() {
    let endpoint = spawn_fixed_oracle(r#"{"verdict": false}"#).await;
    let fixture = gate_for(&config_for(&endpoint));

    let decision = fixture.gate.evaluate(&help_after_greeting()).await.unwrap();

    assert_eq!(decision, GateDecision::Override("utter_error_message".into()));
    assert_eq!(fixture.gate.last_state(), GateState::Blocked);
}

#[tokio::test]
async fn positive_verdict_leaves_prediction_alone() {
    let endpoint = spawn_fixed_oracle(r#"{"verdict": true}"#).await;
    let fixture = gate_for(&config_for(&endpoint));

    let decision = fixture.gate.evaluate(&help_after_greeting()).await.unwrap();

    assert_eq!(decision, GateDecision::NoOverride);
    assert_eq!(fixture.gate.last_state(), GateState::Pass);
    assert!(fixture.observer.oracle_failures().is_empty());
}

#[tokio::test]
async fn unreachable_oracle_fails_open_with_one_transport_failure() {
    let endpoint = unreachable_endpoint().await;
    let fixture = gate_for(&config_for(&endpoint));

    let decision = fixture.gate.evaluate(&help_after_greeting()).await.unwrap();

    assert_eq!(decision, GateDecision::NoOverride);
    let failures = fixture.observer.oracle_failures();
    assert_eq!(failures.len(), 1, "failures: {failures:?}");
    assert_eq!(failures[0].0, "transport");
    assert_eq!(fixture.observer.reconnects(), 1);
}

#[tokio::test]
async fn unparseable_reply_fails_open_as_protocol_failure() {
    let endpoint = spawn_fixed_oracle("maybe later").await;
    let fixture = gate_for(&config_for(&endpoint));

    let decision = fixture.gate.evaluate(&listening("hello")).await.unwrap();

    assert_eq!(decision, GateDecision::NoOverride);
    let failures = fixture.observer.oracle_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "protocol");
    assert_eq!(fixture.observer.reconnects(), 0);
}

#[tokio::test]
async fn reference_oracle_judges_each_turn() {
    let (endpoint, shutdown) = spawn_reference_oracle(ReferenceRules::default()).await;
    let fixture = gate_for(&config_for(&endpoint));

    let blocked = fixture
        .gate
        .evaluate(&listening("are you a bot?"))
        .await
        .unwrap();
    let passed = fixture
        .gate
        .evaluate(&listening("what is the weather"))
        .await
        .unwrap();

    assert_eq!(blocked, GateDecision::Override("utter_error_message".into()));
    assert_eq!(passed, GateDecision::NoOverride);

    fixture.client.close().await;
    shutdown.cancel();
}

#[tokio::test]
async fn reference_oracle_json_replies_are_understood() {
    let rules = ReferenceRules {
        block_keyword: "refund".into(),
        reply_style: ReplyStyle::Json,
    };
    let (endpoint, shutdown) = spawn_reference_oracle(rules).await;
    let fixture = gate_for(&config_for(&endpoint));

    let decision = fixture
        .gate
        .evaluate(&listening("I want a refund"))
        .await
        .unwrap();

    assert_eq!(decision, GateDecision::Override("utter_error_message".into()));
    shutdown.cancel();
}

#[tokio::test]
async fn stopped_oracle_fails_open_after_one_retry() {
    let (endpoint, shutdown) = spawn_reference_oracle(ReferenceRules::default()).await;
    let fixture = gate_for(&config_for(&endpoint));
    fixture
        .client
        .connect(Duration::from_secs(2))
        .await
        .unwrap();

    let first = fixture.gate.evaluate(&listening("hi")).await.unwrap();
    assert_eq!(first, GateDecision::NoOverride);

    shutdown.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = fixture.gate.evaluate(&listening("bot")).await.unwrap();
    assert_eq!(second, GateDecision::NoOverride);
    assert_eq!(fixture.observer.oracle_failures().len(), 1);
    assert_eq!(fixture.observer.reconnects(), 1);
}
