use std::sync::Arc;

use dispo_relay::function::{FunctionEvent, invoke, invoke_raw};
use dispo_relay::{RecordingForwarder, Relay, RelayConfig};
use serde_json::{Value, json};

fn relay(forwarder: Arc<RecordingForwarder>) -> Relay {
    Relay::new(
        RelayConfig {
            webhook_url: Some("https://n8n.example/webhook/dispo".into()),
            ..Default::default()
        },
        forwarder,
    )
}

fn event(value: Value) -> FunctionEvent {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn preflight_event_returns_empty_body_with_cors() {
    let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(Value::Null)));
    let response = invoke(&relay(forwarder.clone()), event(json!({"httpMethod": "OPTIONS"}))).await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "");
    assert_eq!(response.headers["access-control-allow-origin"], "*");
    assert_eq!(
        response.headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert!(forwarder.calls().is_empty());
}

#[tokio::test]
async fn merged_event_fields_are_forwarded() {
    let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(json!({"id": 7}))));
    let response = invoke(
        &relay(forwarder.clone()),
        event(json!({
            "disposition": "Cancellation",
            "customerPhone": "+61400000000",
            "agentName": "Riley"
        })),
    )
    .await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["content-type"], "application/json");
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["n8nResponse"], json!({"id": 7}));

    let calls = forwarder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.customer.phone, "+61400000000");
    assert_eq!(calls[0].1.agent.name, "Riley");
}

#[tokio::test]
async fn both_hosting_shapes_reject_identically() {
    let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(Value::Null)));
    let response = invoke_raw(
        &relay(forwarder.clone()),
        r#"{"httpMethod":"POST","body":"{\"customerName\":\"Jane Doe\"}"}"#,
    )
    .await;
    assert_eq!(response.status_code, 400);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(
        body,
        json!({"success": false, "error": "Disposition is required"})
    );
    assert!(forwarder.calls().is_empty());
}

#[tokio::test]
async fn unreadable_event_is_an_empty_post() {
    let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(Value::Null)));
    let response = invoke_raw(&relay(forwarder.clone()), "not json").await;
    assert_eq!(response.status_code, 400);
    assert!(forwarder.calls().is_empty());
}

#[tokio::test]
async fn odd_headers_do_not_discard_the_submission() {
    for raw in [
        r#"{"httpMethod":"POST","headers":null,"body":"{\"disposition\":\"Upsell\"}"}"#,
        r#"{"headers":{"x-n":1},"disposition":"Upsell"}"#,
    ] {
        let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(json!({"ok": true}))));
        let response = invoke_raw(&relay(forwarder.clone()), raw).await;
        assert_eq!(response.status_code, 200, "{raw}");
        let calls = forwarder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.disposition, "Upsell");
    }
}
