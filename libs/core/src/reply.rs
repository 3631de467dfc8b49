use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS_MESSAGE: &str = "Disposition saved successfully";

/// Body returned by the relay once the downstream webhook accepted the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody {
    pub success: bool,
    pub message: String,
    pub n8n_response: Value,
    pub timestamp: String,
}

impl SuccessBody {
    pub fn new(downstream: Value, timestamp: String) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            n8n_response: downstream,
            timestamp,
        }
    }
}

/// Body returned by the relay on any failure.
///
/// Validation failures omit `details`; configuration and downstream failures
/// always carry it, `null` when nothing came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl FailureBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Some(details.unwrap_or(Value::Null)),
        }
    }
}

/// What the agent panel reads back from any relay reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decodes a downstream response body: JSON when possible, a JSON string otherwise,
/// `null` when empty.
pub fn downstream_body(raw: &[u8]) -> Value {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(raw)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()))
}
