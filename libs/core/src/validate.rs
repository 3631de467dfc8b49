use thiserror::Error;

use crate::{Disposition, SubmissionRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Disposition is required")]
    MissingDisposition,
    #[error("Unknown disposition: {0}")]
    UnknownDisposition(String),
}

/// Controls whether labels outside [`Disposition::ALL`] are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispositionPolicy {
    #[default]
    Strict,
    AllowCustom,
}

/// Returns the disposition label to forward, or why the record must be rejected.
///
/// ```
/// use dispo_core::{validate_disposition, DispositionPolicy, SubmissionRecord, ValidationError};
///
/// let record = SubmissionRecord { disposition: Some("Upsell".into()), ..Default::default() };
/// assert_eq!(validate_disposition(&record, DispositionPolicy::Strict).unwrap(), "Upsell");
///
/// let empty = SubmissionRecord::default();
/// assert_eq!(
///     validate_disposition(&empty, DispositionPolicy::Strict),
///     Err(ValidationError::MissingDisposition)
/// );
/// ```
pub fn validate_disposition(
    record: &SubmissionRecord,
    policy: DispositionPolicy,
) -> Result<String, ValidationError> {
    let label = record
        .disposition
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or(ValidationError::MissingDisposition)?;
    match policy {
        DispositionPolicy::AllowCustom => Ok(label.to_string()),
        DispositionPolicy::Strict => label
            .parse::<Disposition>()
            .map(|d| d.as_str().to_string())
            .map_err(|err| ValidationError::UnknownDisposition(err.0)),
    }
}
