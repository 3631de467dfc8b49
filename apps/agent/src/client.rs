use std::time::Duration;

use async_trait::async_trait;
use dispo_core::{RelayAck, SubmissionRecord};
use thiserror::Error;

pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please select a disposition")]
    NoDisposition,
    #[error("a submission is already in progress")]
    InFlight,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
}

/// Posts a submission record to the relay and returns its acknowledgement.
///
/// Any reply the relay produced is an `Ok`; callers inspect `success`.
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn submit(&self, url: &str, record: &SubmissionRecord) -> Result<RelayAck, SubmitError>;
}

#[derive(Clone)]
pub struct HttpRelayClient {
    client: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new(timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dispo-agent/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn submit(&self, url: &str, record: &SubmissionRecord) -> Result<RelayAck, SubmitError> {
        let response = self
            .client
            .post(url)
            .json(record)
            .send()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        serde_json::from_slice::<RelayAck>(&body).map_err(|err| {
            SubmitError::Transport(format!("invalid relay response (HTTP {status}): {err}"))
        })
    }
}
