use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dispo_core::{Disposition, RelayAck, UnknownDisposition};
use tracing::{info, warn};

use crate::client::{RelayClient, SubmitError};
use crate::task::TaskContext;

pub const LABEL_SELECT_FIRST: &str = "Select Disposition First";
pub const LABEL_SAVING: &str = "Saving...";
pub const LABEL_SAVE: &str = "Save Disposition & Sync to CRM";

/// User-visible feedback raised by the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Local prompt; nothing was sent.
    Prompt(String),
    Success(String),
    Error(String),
}

/// Surface that shows notices to the operator (alert, toast, console...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Shared flag backing the submit button's disabled state.
#[derive(Debug, Clone, Default)]
pub struct SubmitButton {
    in_flight: Arc<AtomicBool>,
}

impl SubmitButton {
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn press(&self) -> Option<PressGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| PressGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }
}

/// Re-enables the button when dropped, whatever the outcome.
struct PressGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for PressGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// State of the disposition panel between renders.
#[derive(Debug, Clone, Default)]
pub struct DispositionForm {
    disposition: Option<Disposition>,
    notes: String,
    button: SubmitButton,
}

impl DispositionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disposition(&self) -> Option<Disposition> {
        self.disposition
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Selects one of the fixed labels. An empty value clears the selection;
    /// unknown labels are refused and leave the selection unchanged.
    pub fn select_disposition(&mut self, value: &str) -> Result<(), UnknownDisposition> {
        if value.is_empty() {
            self.disposition = None;
            return Ok(());
        }
        self.disposition = Some(value.parse()?);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Handle the UI reads to render the button's disabled state.
    pub fn button(&self) -> SubmitButton {
        self.button.clone()
    }

    pub fn button_enabled(&self) -> bool {
        self.disposition.is_some() && !self.button.is_busy()
    }

    pub fn button_label(&self) -> &'static str {
        if self.button.is_busy() {
            LABEL_SAVING
        } else if self.disposition.is_some() {
            LABEL_SAVE
        } else {
            LABEL_SELECT_FIRST
        }
    }

    /// Sends the current selection for `task` to the relay at `endpoint`.
    ///
    /// On success the form returns to its initial state; on any failure the
    /// entered values are kept for resubmission. Every outcome is reported
    /// through `notifier`.
    pub async fn submit(
        &mut self,
        task: &TaskContext,
        endpoint: &str,
        client: &dyn RelayClient,
        notifier: &dyn Notifier,
    ) -> Result<RelayAck, SubmitError> {
        let Some(disposition) = self.disposition else {
            notifier.notify(Notice::Prompt(SubmitError::NoDisposition.to_string()));
            return Err(SubmitError::NoDisposition);
        };
        let Some(_pressed) = self.button.press() else {
            return Err(SubmitError::InFlight);
        };

        let record = task.submission_record(disposition, &self.notes);
        info!(%disposition, task_sid = ?record.task_sid, %endpoint, "saving disposition");

        match client.submit(endpoint, &record).await {
            Ok(ack) if ack.success => {
                notifier.notify(Notice::Success(format!(
                    "Disposition saved successfully!\n\nDisposition: {disposition}\nSynced to n8n"
                )));
                self.disposition = None;
                self.notes.clear();
                Ok(ack)
            }
            Ok(ack) => {
                let message = ack
                    .error
                    .clone()
                    .unwrap_or_else(|| "relay reported failure".into());
                warn!(error = %message, "relay rejected disposition");
                notifier.notify(Notice::Error(format!("Error: {message}")));
                Err(SubmitError::Rejected(message))
            }
            Err(err) => {
                warn!(error = %err, "failed to reach relay");
                notifier.notify(Notice::Error(format!("Error saving disposition: {err}")));
                Err(err)
            }
        }
    }
}
