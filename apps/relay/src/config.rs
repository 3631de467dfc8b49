use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dispo_core::DispositionPolicy;

pub const WEBHOOK_URL_VAR: &str = "N8N_DISPOSITION_WEBHOOK";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
const MIN_TIMEOUT_MS: u64 = 1_000;
const MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub addr: SocketAddr,
    /// Downstream webhook; `None` makes every POST fail with a 500.
    pub webhook_url: Option<String>,
    pub account_sid: Option<String>,
    pub webhook_secret: Option<String>,
    pub timeout: Duration,
    pub policy: DispositionPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            webhook_url: None,
            account_sid: None,
            webhook_secret: None,
            timeout: DEFAULT_TIMEOUT,
            policy: DispositionPolicy::Strict,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into());
        let ip = IpAddr::from_str(bind_addr.trim()).context("invalid BIND_ADDR")?;
        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().context("invalid PORT")?,
            None => DEFAULT_PORT,
        };
        let timeout = match get("DISPOSITION_WEBHOOK_TIMEOUT_MS") {
            Some(raw) => {
                let ms = raw
                    .trim()
                    .parse::<u64>()
                    .context("invalid DISPOSITION_WEBHOOK_TIMEOUT_MS")?;
                Duration::from_millis(ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS))
            }
            None => DEFAULT_TIMEOUT,
        };
        let allow_custom = get("DISPOSITION_ALLOW_CUSTOM")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            webhook_url: get(WEBHOOK_URL_VAR).map(|v| v.trim().to_string()),
            account_sid: get("ACCOUNT_SID"),
            webhook_secret: get("N8N_WEBHOOK_SECRET"),
            timeout,
            policy: if allow_custom {
                DispositionPolicy::AllowCustom
            } else {
                DispositionPolicy::Strict
            },
        })
    }
}
