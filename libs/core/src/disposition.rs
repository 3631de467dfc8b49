use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Categorical outcome an agent records for a completed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    BookingCreated,
    QuoteGiven,
    Reschedule,
    Cancellation,
    NoShow,
    Complaint,
    Upsell,
    GeneralEnquiry,
}

impl Disposition {
    /// Every disposition in the order the agent form lists them.
    pub const ALL: [Disposition; 8] = [
        Disposition::BookingCreated,
        Disposition::QuoteGiven,
        Disposition::Reschedule,
        Disposition::Cancellation,
        Disposition::NoShow,
        Disposition::Complaint,
        Disposition::Upsell,
        Disposition::GeneralEnquiry,
    ];

    /// Returns the label shown to agents and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::BookingCreated => "Booking created",
            Disposition::QuoteGiven => "Quote given",
            Disposition::Reschedule => "Reschedule",
            Disposition::Cancellation => "Cancellation",
            Disposition::NoShow => "No-show",
            Disposition::Complaint => "Complaint",
            Disposition::Upsell => "Upsell",
            Disposition::GeneralEnquiry => "General enquiry",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown disposition `{0}`")]
pub struct UnknownDisposition(pub String);

impl FromStr for Disposition {
    type Err = UnknownDisposition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Disposition::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDisposition(s.to_string()))
    }
}

impl Serialize for Disposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Disposition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for d in Disposition::ALL {
            assert_eq!(d.as_str().parse::<Disposition>().unwrap(), d);
        }
    }

    #[test]
    fn parsing_is_exact() {
        assert!("reschedule".parse::<Disposition>().is_err());
        assert!(" Reschedule".parse::<Disposition>().is_err());
        let err = "Callback".parse::<Disposition>().unwrap_err();
        assert_eq!(err.to_string(), "unknown disposition `Callback`");
    }

    #[test]
    fn serializes_as_label() {
        let value = serde_json::to_value(Disposition::NoShow).unwrap();
        assert_eq!(value, serde_json::json!("No-show"));
        let back: Disposition = serde_json::from_value(serde_json::json!("General enquiry")).unwrap();
        assert_eq!(back, Disposition::GeneralEnquiry);
    }
}
