use dispo_core::{CLIENT_DEFAULTS, Disposition, SubmissionRecord, or_default};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Call/task details the host UI resolves for the active task.
///
/// Passed explicitly into record construction; nothing is read from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContext {
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub worker_name: Option<String>,
    /// Seconds since the task was created.
    #[serde(default)]
    pub age: Option<u64>,
    /// Free-form task attributes as delivered by the contact-center platform.
    #[serde(default)]
    pub attributes: Value,
}

/// Values shown in the panel header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSummary {
    pub customer: String,
    pub phone: String,
    pub call_sid: String,
    pub test_mode: bool,
}

impl TaskContext {
    /// No active task: the panel runs against placeholder data.
    pub fn is_test_mode(&self) -> bool {
        self.sid.as_deref().map(str::is_empty).unwrap_or(true)
    }

    fn attr(&self, path: &[&str]) -> Option<&str> {
        let mut current = &self.attributes;
        for key in path {
            current = current.get(key)?;
        }
        current.as_str().filter(|s| !s.is_empty())
    }

    pub fn call_sid(&self) -> Option<&str> {
        self.attr(&["call_sid"])
            .or_else(|| self.attr(&["conference", "sid"]))
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.attr(&["from"]).or_else(|| self.attr(&["outbound_to"]))
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.attr(&["name"])
            .or_else(|| self.attr(&["customers", "name"]))
    }

    /// Builds the fully-populated record the panel posts to the relay.
    pub fn submission_record(&self, disposition: Disposition, notes: &str) -> SubmissionRecord {
        let d = &CLIENT_DEFAULTS;
        SubmissionRecord {
            task_sid: Some(or_default(self.sid.as_deref(), d.task_sid)),
            call_sid: Some(or_default(self.call_sid(), d.call_sid)),
            disposition: Some(disposition.as_str().to_string()),
            notes: Some(or_default(Some(notes), d.notes)),
            customer_phone: Some(or_default(self.customer_phone(), d.customer_phone)),
            customer_name: Some(or_default(self.customer_name(), d.customer_name)),
            agent_name: Some(or_default(self.worker_name.as_deref(), d.agent_name)),
            call_duration: Some(self.age.unwrap_or(0)),
            recording_url: None,
        }
    }

    pub fn summary(&self) -> PanelSummary {
        PanelSummary {
            customer: self.attr(&["name"]).unwrap_or("Test Customer").to_string(),
            phone: self.attr(&["from"]).unwrap_or("+1234567890").to_string(),
            call_sid: or_default(self.sid.as_deref(), "TEST-SID-12345"),
            test_mode: self.is_test_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_task_uses_client_defaults() {
        let record = TaskContext::default().submission_record(Disposition::Upsell, "");
        assert_eq!(record.task_sid.as_deref(), Some("TEST-SID"));
        assert_eq!(record.call_sid.as_deref(), Some("N/A"));
        assert_eq!(record.notes.as_deref(), Some(""));
        assert_eq!(record.customer_phone.as_deref(), Some("N/A"));
        assert_eq!(record.customer_name.as_deref(), Some("Unknown"));
        assert_eq!(record.agent_name.as_deref(), Some("Agent"));
        assert_eq!(record.call_duration, Some(0));
        assert_eq!(record.recording_url, None);
    }

    #[test]
    fn derives_fields_from_attributes_with_fallbacks() {
        let task = TaskContext {
            sid: Some("WT100".into()),
            worker_name: Some("Alex".into()),
            age: Some(312),
            attributes: json!({
                "conference": {"sid": "CF9"},
                "outbound_to": "+15550001111",
                "customers": {"name": "Jane Doe"}
            }),
        };
        let record = task.submission_record(Disposition::Reschedule, "moved to Friday");
        assert_eq!(record.task_sid.as_deref(), Some("WT100"));
        assert_eq!(record.call_sid.as_deref(), Some("CF9"));
        assert_eq!(record.customer_phone.as_deref(), Some("+15550001111"));
        assert_eq!(record.customer_name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.agent_name.as_deref(), Some("Alex"));
        assert_eq!(record.call_duration, Some(312));
        assert_eq!(record.disposition.as_deref(), Some("Reschedule"));
        assert_eq!(record.notes.as_deref(), Some("moved to Friday"));
    }

    #[test]
    fn primary_attributes_take_precedence() {
        let task = TaskContext {
            attributes: json!({
                "call_sid": "CA1",
                "conference": {"sid": "CF9"},
                "from": "+15551234567",
                "outbound_to": "+15550001111",
                "name": "Sam",
                "customers": {"name": "Jane Doe"}
            }),
            ..Default::default()
        };
        assert_eq!(task.call_sid(), Some("CA1"));
        assert_eq!(task.customer_phone(), Some("+15551234567"));
        assert_eq!(task.customer_name(), Some("Sam"));
    }

    #[test]
    fn summary_reports_test_mode_placeholders() {
        let summary = TaskContext::default().summary();
        assert!(summary.test_mode);
        assert_eq!(summary.customer, "Test Customer");
        assert_eq!(summary.phone, "+1234567890");
        assert_eq!(summary.call_sid, "TEST-SID-12345");
    }

    #[test]
    fn deserializes_host_task_document() {
        let task: TaskContext = serde_json::from_value(json!({
            "sid": "WT5",
            "workerName": "Kim",
            "attributes": {"from": "+15559990000"}
        }))
        .unwrap();
        assert!(!task.is_test_mode());
        assert_eq!(task.customer_phone(), Some("+15559990000"));
    }
}
