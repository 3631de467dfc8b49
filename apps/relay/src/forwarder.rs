use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dispo_core::{DownstreamEnvelope, JSON_CONTENT_TYPE, downstream_body};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;

pub const SECRET_HEADER: &str = "X-Webhook-Secret";

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Value },
    #[error("{0}")]
    Transport(String),
}

impl ForwardError {
    /// Structured body the downstream system returned with the failure, if any.
    pub fn details(&self) -> Option<Value> {
        match self {
            ForwardError::Status { body, .. } if !body.is_null() => Some(body.clone()),
            _ => None,
        }
    }
}

/// Delivers one envelope to the downstream webhook and returns its decoded body.
///
/// Implementations make exactly one attempt.
#[async_trait]
pub trait WebhookForwarder: Send + Sync {
    async fn forward(&self, url: &str, envelope: &DownstreamEnvelope)
    -> Result<Value, ForwardError>;
}

/// Forwarder backed by a pooled `reqwest` client with a per-request timeout.
#[derive(Clone)]
pub struct HttpWebhookForwarder {
    client: reqwest::Client,
    timeout: Duration,
    secret: Option<String>,
}

impl HttpWebhookForwarder {
    pub fn new(timeout: Duration, secret: Option<String>) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dispo-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ForwardError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            timeout,
            secret,
        })
    }
}

#[async_trait]
impl WebhookForwarder for HttpWebhookForwarder {
    async fn forward(
        &self,
        url: &str,
        envelope: &DownstreamEnvelope,
    ) -> Result<Value, ForwardError> {
        let mut req = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(envelope)
            .timeout(self.timeout);
        if let Some(secret) = &self.secret {
            req = req.header(SECRET_HEADER, secret);
        }

        let response = req.send().await.map_err(|err| self.classify(err))?;
        let status = response.status();
        let raw = response.bytes().await.map_err(|err| self.classify(err))?;
        let body = downstream_body(&raw);
        if !status.is_success() {
            return Err(ForwardError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl HttpWebhookForwarder {
    fn classify(&self, err: reqwest::Error) -> ForwardError {
        if err.is_timeout() {
            ForwardError::Timeout(self.timeout)
        } else {
            ForwardError::Transport(err.to_string())
        }
    }
}

/// In-memory forwarder used in tests; records every envelope it receives.
pub struct RecordingForwarder {
    responder: Box<dyn Fn(&DownstreamEnvelope) -> Result<Value, ForwardError> + Send + Sync>,
    calls: Mutex<Vec<(String, DownstreamEnvelope)>>,
}

impl RecordingForwarder {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&DownstreamEnvelope) -> Result<Value, ForwardError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, DownstreamEnvelope)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl WebhookForwarder for RecordingForwarder {
    async fn forward(
        &self,
        url: &str,
        envelope: &DownstreamEnvelope,
    ) -> Result<Value, ForwardError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((url.to_string(), envelope.clone()));
        }
        (self.responder)(envelope)
    }
}
