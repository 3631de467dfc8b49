// Drives the agent form against a real relay served on localhost.
// Skips if binding to localhost is not permitted in the current environment.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dispo_agent::{
    DispositionForm, HttpRelayClient, Notice, Notifier, SubmitError, TaskContext,
};
use dispo_relay::http::build_router;
use dispo_relay::{RecordingForwarder, Relay, RelayConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct Notices(Mutex<Vec<Notice>>);

impl Notifier for Notices {
    fn notify(&self, notice: Notice) {
        self.0.lock().unwrap().push(notice);
    }
}

async fn serve_relay(relay: Relay) -> Option<(String, tokio::task::JoinHandle<()>)> {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("skipping relay round trip: {err}");
            return None;
        }
    };
    let addr = listener.local_addr().unwrap();
    let router = build_router(relay);
    let server = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("relay server error: {err}");
        }
    });
    Some((format!("http://{addr}/disposition-handler"), server))
}

fn task() -> TaskContext {
    serde_json::from_value(json!({
        "sid": "WT777",
        "workerName": "Alex",
        "age": 95,
        "attributes": {"call_sid": "CA1", "from": "+15551234567", "name": "Jane Doe"}
    }))
    .unwrap()
}

#[tokio::test]
async fn successful_submission_reaches_downstream_and_resets_form() {
    let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(json!({"id": 123}))));
    let relay = Relay::new(
        RelayConfig {
            webhook_url: Some("https://n8n.example/webhook/dispo".into()),
            ..Default::default()
        },
        forwarder.clone(),
    );
    let Some((url, server)) = serve_relay(relay).await else {
        return;
    };

    let mut form = DispositionForm::new();
    form.select_disposition("Booking created").unwrap();
    form.set_notes("Tuesday 9am");
    let client = HttpRelayClient::new(Duration::from_secs(5)).unwrap();
    let notices = Notices::default();

    let ack = form.submit(&task(), &url, &client, &notices).await.unwrap();
    assert!(ack.success);
    assert_eq!(form.disposition(), None);
    assert_eq!(form.notes(), "");
    assert!(!form.button().is_busy());

    let calls = forwarder.calls();
    assert_eq!(calls.len(), 1);
    let envelope = &calls[0].1;
    assert_eq!(envelope.task_sid, "WT777");
    assert_eq!(envelope.call_sid, "CA1");
    assert_eq!(envelope.disposition, "Booking created");
    assert_eq!(envelope.notes, "Tuesday 9am");
    assert_eq!(envelope.customer.name, "Jane Doe");
    assert_eq!(envelope.agent.name, "Alex");
    assert_eq!(envelope.call.duration, 95);

    server.abort();
}

#[tokio::test]
async fn misconfigured_relay_error_is_shown_and_values_kept() {
    let forwarder = Arc::new(RecordingForwarder::new(|_| Ok(Value::Null)));
    let relay = Relay::new(RelayConfig::default(), forwarder.clone());
    let Some((url, server)) = serve_relay(relay).await else {
        return;
    };

    let mut form = DispositionForm::new();
    form.select_disposition("Complaint").unwrap();
    form.set_notes("billing issue");
    let client = HttpRelayClient::new(Duration::from_secs(5)).unwrap();
    let notices = Notices::default();

    let err = form.submit(&task(), &url, &client, &notices).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected("N8N_DISPOSITION_WEBHOOK not configured".into())
    );
    assert_eq!(form.notes(), "billing issue");
    assert!(form.button_enabled());
    assert!(forwarder.calls().is_empty());
    assert_eq!(
        notices.0.lock().unwrap().as_slice(),
        [Notice::Error("Error: N8N_DISPOSITION_WEBHOOK not configured".into())]
    );

    server.abort();
}

#[tokio::test]
async fn unreachable_relay_is_reported_as_transport_error() {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("skipping unreachable_relay_is_reported_as_transport_error: {err}");
            return;
        }
    };
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut form = DispositionForm::new();
    form.select_disposition("Upsell").unwrap();
    let client = HttpRelayClient::new(Duration::from_secs(2)).unwrap();
    let notices = Notices::default();

    let err = form
        .submit(
            &task(),
            &format!("http://{addr}/disposition-handler"),
            &client,
            &notices,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
    assert_eq!(form.disposition().map(|d| d.as_str()), Some("Upsell"));
    let notices = notices.0.lock().unwrap();
    assert!(matches!(&notices[0], Notice::Error(msg) if msg.starts_with("Error saving disposition: ")));
}
