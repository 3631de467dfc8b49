use std::sync::Arc;

use dispo_core::{
    DownstreamEnvelope, FailureBody, SubmissionRecord, SuccessBody, ValidationError, now_iso,
    validate_disposition,
};
use dispo_telemetry::record_counter;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{Instrument, info, warn};

use crate::config::{RelayConfig, WEBHOOK_URL_VAR};
use crate::forwarder::{ForwardError, WebhookForwarder};

const SERVICE: &str = "disposition-relay";

/// Outcome of one relay invocation, independent of the hosting shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub status: StatusCode,
    /// `None` for the empty preflight reply.
    pub body: Option<Value>,
}

impl RelayReply {
    fn json(status: StatusCode, body: impl serde::Serialize) -> Self {
        Self {
            status,
            body: Some(serde_json::to_value(body).unwrap_or(Value::Null)),
        }
    }

    /// Empty 200 answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    pub fn headers(&self) -> HeaderMap {
        dispo_core::relay_headers()
    }

    /// Serialized body; empty for the preflight reply.
    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("N8N_DISPOSITION_WEBHOOK not configured")]
    NotConfigured,
    #[error(transparent)]
    Downstream(#[from] ForwardError),
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::NotConfigured | RelayError::Downstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn into_reply(self) -> RelayReply {
        let status = self.status();
        let body = match &self {
            RelayError::Validation(_) | RelayError::MethodNotAllowed(_) => {
                FailureBody::new(self.to_string())
            }
            RelayError::NotConfigured => FailureBody::with_details(self.to_string(), None),
            RelayError::Downstream(err) => FailureBody::with_details(err.to_string(), err.details()),
        };
        RelayReply::json(status, body)
    }

    fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::NotConfigured => "not_configured",
            RelayError::Downstream(ForwardError::Timeout(_)) => "timeout",
            RelayError::Downstream(ForwardError::Status { .. }) => "downstream_status",
            RelayError::Downstream(ForwardError::Transport(_)) => "transport",
            RelayError::MethodNotAllowed(_) => "method",
        }
    }
}

/// Stateless relay shared by every hosting adapter.
#[derive(Clone)]
pub struct Relay {
    config: Arc<RelayConfig>,
    forwarder: Arc<dyn WebhookForwarder>,
}

impl Relay {
    pub fn new(config: RelayConfig, forwarder: Arc<dyn WebhookForwarder>) -> Self {
        Self {
            config: Arc::new(config),
            forwarder,
        }
    }

    /// Handles one request. Never fails: every error becomes a JSON reply.
    pub async fn handle(&self, method: &Method, record: SubmissionRecord) -> RelayReply {
        if method == Method::OPTIONS {
            return RelayReply::preflight();
        }
        record_counter("disposition_relay_requests", SERVICE, &[]);
        let result = if method == Method::POST {
            self.submit(record).await
        } else {
            Err(RelayError::MethodNotAllowed(method.clone()))
        };
        match result {
            Ok(body) => RelayReply::json(StatusCode::OK, body),
            Err(err) => {
                let kind = err.kind();
                if matches!(err, RelayError::Validation(_) | RelayError::MethodNotAllowed(_)) {
                    record_counter(
                        "disposition_relay_rejected",
                        SERVICE,
                        &[("reason", kind.to_string())],
                    );
                } else {
                    record_counter(
                        "disposition_relay_failed",
                        SERVICE,
                        &[("reason", kind.to_string())],
                    );
                }
                err.into_reply()
            }
        }
    }

    async fn submit(&self, record: SubmissionRecord) -> Result<SuccessBody, RelayError> {
        let span = tracing::info_span!(
            "disposition.relay",
            disposition = record.disposition.as_deref().unwrap_or(""),
            task_sid = record.task_sid.as_deref().unwrap_or("")
        );
        async move {
            let disposition = validate_disposition(&record, self.config.policy).inspect_err(
                |err| warn!(error = %err, "rejecting disposition submission"),
            )?;

            let url = self.config.webhook_url.as_deref().ok_or_else(|| {
                tracing::error!(
                    var = WEBHOOK_URL_VAR,
                    "webhook url is not set; refusing to forward"
                );
                RelayError::NotConfigured
            })?;

            let envelope = DownstreamEnvelope::build(
                &record,
                disposition,
                self.config.account_sid.as_deref(),
                now_iso(),
            );

            let downstream = self
                .forwarder
                .forward(url, &envelope)
                .await
                .inspect_err(|err| tracing::error!(error = %err, "downstream webhook failed"))?;

            record_counter("disposition_relay_forwarded", SERVICE, &[]);
            info!(disposition = %envelope.disposition, "disposition forwarded");
            Ok(SuccessBody::new(downstream, now_iso()))
        }
        .instrument(span)
        .await
    }
}

/// Decodes a request body according to its content type. Anything that cannot
/// be read becomes an empty record.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> SubmissionRecord {
    let is_form = content_type
        .map(|ct| {
            ct.trim()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false);
    if is_form {
        SubmissionRecord::from_form(body)
    } else {
        SubmissionRecord::from_body(body)
    }
}
