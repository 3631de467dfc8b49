//! Lightweight telemetry helpers for the disposition services: a tracing
//! subscriber configured from the environment and counter recording.

use anyhow::Result;

mod config;
mod metrics;
mod tracing_init;

pub use config::TelemetryConfig;
pub use self::metrics::record_counter;
pub use tracing_init::init_tracing;

/// Installs the tracing subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<TelemetryConfig> {
    let cfg = TelemetryConfig::from_env(service_name);
    init_tracing(&cfg)?;
    Ok(cfg)
}
