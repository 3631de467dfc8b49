use serde::{Deserialize, Serialize};

use crate::record::{RELAY_DEFAULTS, SubmissionRecord, or_default};

pub const EVENT_NAME: &str = "call_disposition";
pub const EVENT_SOURCE: &str = "twilio_flex";

/// Event posted to the downstream automation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownstreamEnvelope {
    pub event: String,
    pub timestamp: String,
    pub task_sid: String,
    pub call_sid: String,
    pub disposition: String,
    pub notes: String,
    pub customer: CustomerInfo,
    pub agent: AgentInfo,
    pub call: CallInfo,
    pub metadata: EnvelopeMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallInfo {
    pub duration: u64,
    pub recording_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMetadata {
    pub source: String,
    pub account_sid: Option<String>,
}

impl DownstreamEnvelope {
    /// Reshapes a submission into the downstream event, re-applying the relay defaults
    /// to every optional field. `disposition` is the already-validated label.
    ///
    /// ```
    /// use dispo_core::{DownstreamEnvelope, SubmissionRecord};
    ///
    /// let env = DownstreamEnvelope::build(
    ///     &SubmissionRecord::default(),
    ///     "Upsell".into(),
    ///     None,
    ///     "2024-01-01T00:00:00.000Z".into(),
    /// );
    /// assert_eq!(env.agent.name, "Unknown");
    /// assert_eq!(env.call.duration, 0);
    /// ```
    pub fn build(
        record: &SubmissionRecord,
        disposition: String,
        account_sid: Option<&str>,
        timestamp: String,
    ) -> Self {
        let d = &RELAY_DEFAULTS;
        Self {
            event: EVENT_NAME.to_string(),
            timestamp,
            task_sid: or_default(record.task_sid.as_deref(), d.task_sid),
            call_sid: or_default(record.call_sid.as_deref(), d.call_sid),
            disposition,
            notes: or_default(record.notes.as_deref(), d.notes),
            customer: CustomerInfo {
                name: or_default(record.customer_name.as_deref(), d.customer_name),
                phone: or_default(record.customer_phone.as_deref(), d.customer_phone),
            },
            agent: AgentInfo {
                name: or_default(record.agent_name.as_deref(), d.agent_name),
            },
            call: CallInfo {
                duration: record.call_duration.unwrap_or(0),
                recording_url: record.recording_url.clone().filter(|url| !url.is_empty()),
            },
            metadata: EnvelopeMetadata {
                source: EVENT_SOURCE.to_string(),
                account_sid: account_sid.filter(|sid| !sid.is_empty()).map(str::to_string),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TS: &str = "2024-05-01T09:30:00.125Z";

    #[test]
    fn reschedule_example_matches_documented_shape() {
        let record = SubmissionRecord::from_value(&json!({
            "disposition": "Reschedule",
            "customerName": "Jane Doe",
            "customerPhone": "+15551234567"
        }));
        let env = DownstreamEnvelope::build(&record, "Reschedule".into(), None, TS.into());
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "event": "call_disposition",
                "timestamp": TS,
                "taskSid": "N/A",
                "callSid": "N/A",
                "disposition": "Reschedule",
                "notes": "",
                "customer": { "name": "Jane Doe", "phone": "+15551234567" },
                "agent": { "name": "Unknown" },
                "call": { "duration": 0, "recordingUrl": null },
                "metadata": { "source": "twilio_flex", "accountSid": null }
            })
        );
    }

    #[test]
    fn supplied_fields_and_account_sid_pass_through() {
        let record = SubmissionRecord {
            task_sid: Some("WT123".into()),
            call_sid: Some("CA456".into()),
            notes: Some("call back Tuesday".into()),
            agent_name: Some("Sam".into()),
            call_duration: Some(187),
            recording_url: Some("https://rec.example/1.wav".into()),
            ..Default::default()
        };
        let env = DownstreamEnvelope::build(&record, "Upsell".into(), Some("AC789"), TS.into());
        assert_eq!(env.task_sid, "WT123");
        assert_eq!(env.call_sid, "CA456");
        assert_eq!(env.notes, "call back Tuesday");
        assert_eq!(env.agent.name, "Sam");
        assert_eq!(env.call.duration, 187);
        assert_eq!(env.call.recording_url.as_deref(), Some("https://rec.example/1.wav"));
        assert_eq!(env.metadata.account_sid.as_deref(), Some("AC789"));
    }

    #[test]
    fn client_defaults_are_not_trusted_as_relay_defaults() {
        // "TEST-SID" is a client placeholder but still a real value for the relay.
        let record = SubmissionRecord {
            task_sid: Some("TEST-SID".into()),
            agent_name: Some(String::new()),
            ..Default::default()
        };
        let env = DownstreamEnvelope::build(&record, "Complaint".into(), Some(""), TS.into());
        assert_eq!(env.task_sid, "TEST-SID");
        assert_eq!(env.agent.name, "Unknown");
        assert_eq!(env.metadata.account_sid, None);
    }
}
