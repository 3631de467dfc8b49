//! Serverless hosting shape: one invocation event in, one response document out.
//!
//! Function runtimes hand over the request either as a raw `body` string or
//! with the submission fields merged directly into the event object; both are
//! accepted.

use std::collections::BTreeMap;

use http::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::relay::{Relay, parse_body};
use dispo_core::SubmissionRecord;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    /// Null or non-object headers read as none; scalar values are kept as text.
    #[serde(default, deserialize_with = "lenient_headers")]
    pub headers: BTreeMap<String, String>,
    /// Raw body text, or a body the runtime already decoded.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn lenient_headers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(text) => Some((name, text)),
            Value::Number(n) => Some((name, n.to_string())),
            Value::Bool(b) => Some((name, b.to_string())),
            _ => None,
        })
        .collect())
}

impl FunctionEvent {
    /// Missing methods default to POST, the only verb function runtimes route here.
    pub fn method(&self) -> Method {
        self.http_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .and_then(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()).ok())
            .unwrap_or(Method::POST)
    }

    pub fn record(&self) -> SubmissionRecord {
        match &self.body {
            Some(Value::String(raw)) => {
                let content_type = self
                    .headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                    .map(|(_, v)| v.as_str());
                parse_body(content_type, raw.as_bytes())
            }
            Some(decoded @ Value::Object(_)) => SubmissionRecord::from_value(decoded),
            _ => SubmissionRecord::from_value(&Value::Object(self.fields.clone())),
        }
    }
}

/// Runs one function invocation through the shared relay.
pub async fn invoke(relay: &Relay, event: FunctionEvent) -> FunctionResponse {
    let reply = relay.handle(&event.method(), event.record()).await;
    let headers = reply
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    FunctionResponse {
        status_code: reply.status.as_u16(),
        headers,
        body: reply.body_string(),
    }
}

/// Parses a raw event document; an unreadable document is treated as an empty POST.
pub async fn invoke_raw(relay: &Relay, raw: &str) -> FunctionResponse {
    let event = serde_json::from_str::<FunctionEvent>(raw).unwrap_or_default();
    invoke(relay, event).await
}
