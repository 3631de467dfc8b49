//! Stateless relay that validates call disposition submissions and forwards
//! them to the downstream automation webhook.
//!
//! [`relay::Relay`] holds the request semantics; [`http`] and [`function`] are
//! thin hosting adapters over it so both deployments answer identically.

pub mod config;
pub mod forwarder;
pub mod function;
pub mod http;
pub mod relay;

use std::sync::Arc;

use anyhow::Result;

pub use config::RelayConfig;
pub use forwarder::{ForwardError, HttpWebhookForwarder, RecordingForwarder, WebhookForwarder};
pub use relay::{Relay, RelayError, RelayReply};

/// Builds the production relay: HTTP forwarder configured from `config`.
pub fn relay_from_config(config: RelayConfig) -> Result<Relay> {
    let forwarder = HttpWebhookForwarder::new(config.timeout, config.webhook_secret.clone())?;
    Ok(Relay::new(config, Arc::new(forwarder)))
}
