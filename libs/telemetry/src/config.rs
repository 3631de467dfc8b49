use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub json_logs: bool,
    pub default_filter: String,
}

impl TelemetryConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(default_service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_name = lookup("SERVICE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default_service_name.to_string());
        let json_logs = lookup("LOG_FORMAT")
            .map(|v| !matches!(v.to_lowercase().as_str(), "text" | "pretty" | "plain"))
            .unwrap_or(false);
        Self {
            service_name,
            json_logs,
            default_filter: "info".into(),
        }
    }
}
