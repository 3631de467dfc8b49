use std::env;

pub const LOCAL_ENDPOINT: &str = "http://localhost:3000/disposition-handler";
pub const PRODUCTION_ENDPOINT: &str = "https://REPLACE_WITH_YOUR_RAILWAY_DOMAIN/disposition-handler";

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Inputs that decide where the panel posts submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointEnv {
    /// Relay address configured for the UI; wins when non-empty.
    pub configured_url: Option<String>,
    /// Hostname the UI is served from.
    pub hostname: Option<String>,
}

impl EndpointEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            configured_url: lookup("DISPOSITION_HANDLER_URL"),
            hostname: lookup("DISPOSITION_UI_HOST"),
        }
    }
}

/// Resolves the relay address: configured URL, then the local dev relay when
/// running on a local host, then the production placeholder.
///
/// ```
/// use dispo_agent::endpoint::{EndpointEnv, resolve_endpoint, LOCAL_ENDPOINT};
///
/// let env = EndpointEnv { configured_url: None, hostname: Some("localhost".into()) };
/// assert_eq!(resolve_endpoint(&env), LOCAL_ENDPOINT);
/// ```
pub fn resolve_endpoint(env: &EndpointEnv) -> String {
    if let Some(url) = env
        .configured_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    {
        return url.to_string();
    }
    let local = env
        .hostname
        .as_deref()
        .map(|host| LOCAL_HOSTS.contains(&host.trim().to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if local {
        LOCAL_ENDPOINT.to_string()
    } else {
        PRODUCTION_ENDPOINT.to_string()
    }
}
