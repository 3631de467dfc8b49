use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback values substituted for optional submission fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefaults {
    pub task_sid: &'static str,
    pub call_sid: &'static str,
    pub notes: &'static str,
    pub customer_phone: &'static str,
    pub customer_name: &'static str,
    pub agent_name: &'static str,
}

/// Defaults the agent panel applies when the task context is incomplete.
pub const CLIENT_DEFAULTS: FieldDefaults = FieldDefaults {
    task_sid: "TEST-SID",
    call_sid: "N/A",
    notes: "",
    customer_phone: "N/A",
    customer_name: "Unknown",
    agent_name: "Agent",
};

/// Defaults the relay re-applies to every inbound record.
pub const RELAY_DEFAULTS: FieldDefaults = FieldDefaults {
    task_sid: "N/A",
    call_sid: "N/A",
    notes: "",
    customer_phone: "N/A",
    customer_name: "Unknown",
    agent_name: "Unknown",
};

/// Disposition submission as exchanged between the agent panel and the relay.
///
/// Every field is optional on the wire; empty strings count as absent.
///
/// ```
/// use dispo_core::SubmissionRecord;
///
/// let record = SubmissionRecord::from_body(br#"{"disposition":"Upsell","callDuration":"42"}"#);
/// assert_eq!(record.disposition.as_deref(), Some("Upsell"));
/// assert_eq!(record.call_duration, Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub task_sid: Option<String>,
    pub call_sid: Option<String>,
    pub disposition: Option<String>,
    pub notes: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub agent_name: Option<String>,
    pub call_duration: Option<u64>,
    pub recording_url: Option<String>,
}

impl SubmissionRecord {
    /// Parses a JSON request body. Missing or unparseable bodies yield an empty record.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice::<Value>(body)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// Parses an `application/x-www-form-urlencoded` request body.
    pub fn from_form(body: &[u8]) -> Self {
        let fields: Map<String, Value> = url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        Self::from_value(&Value::Object(fields))
    }

    /// Extracts the known fields from an arbitrary JSON value, ignoring unknown keys
    /// and values of the wrong type.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            task_sid: text_field(obj, "taskSid"),
            call_sid: text_field(obj, "callSid"),
            disposition: text_field(obj, "disposition"),
            notes: text_field(obj, "notes"),
            customer_phone: text_field(obj, "customerPhone"),
            customer_name: text_field(obj, "customerName"),
            agent_name: text_field(obj, "agentName"),
            call_duration: obj.get("callDuration").and_then(duration_seconds),
            recording_url: text_field(obj, "recordingUrl"),
        }
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn duration_seconds(value: &Value) -> Option<u64> {
    let seconds = match value {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return (whole > 0).then_some(whole);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() || seconds < 1.0 {
        return None;
    }
    Some(seconds.trunc() as u64)
}

/// Picks `value` when present and non-empty, otherwise the fallback.
pub fn or_default(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
