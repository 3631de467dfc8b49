//! Agent-side submission client for call dispositions.
//!
//! The host desktop renders the panel; this crate owns its state
//! ([`form::DispositionForm`]), the record built from the explicit task
//! context, relay endpoint resolution and the single outbound call.

pub mod client;
pub mod endpoint;
pub mod form;
pub mod panel;
pub mod task;

pub use client::{DEFAULT_CLIENT_TIMEOUT, HttpRelayClient, RelayClient, SubmitError};
pub use endpoint::{EndpointEnv, resolve_endpoint};
pub use form::{DispositionForm, Notice, Notifier, SubmitButton};
pub use panel::{PanelHost, PanelRegistry, PanelSlot, PanelSpec, register_disposition_panel};
pub use task::{PanelSummary, TaskContext};
