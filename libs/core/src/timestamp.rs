use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Formats an instant as an ISO-8601 UTC string with millisecond precision,
/// e.g. `2024-05-01T09:30:00.125Z`.
pub fn iso_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    at.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

pub fn now_iso() -> String {
    iso_timestamp(OffsetDateTime::now_utc())
}
