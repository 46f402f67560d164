use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Client input that was rejected before reaching the store. The payload
/// names the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// `0001-01-01T00:00:00Z`, the unset instant many device firmwares and
/// bridges send when they have no clock.
fn zero_instant() -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn is_zero_instant(timestamp: &DateTime<Utc>) -> bool {
    zero_instant().is_some_and(|zero| zero == *timestamp)
}

/// Checks a fix before it is appended. Coordinates are taken as given, no
/// range check is applied to latitude or longitude.
pub fn validate_fix(
    device_id: &str,
    timestamp: Option<&DateTime<Utc>>,
) -> Result<DateTime<Utc>, ValidationError> {
    if device_id.is_empty() {
        return Err(ValidationError::MissingParameter("device_id"));
    }
    match timestamp {
        Some(timestamp) if !is_zero_instant(timestamp) => Ok(*timestamp),
        _ => Err(ValidationError::MissingParameter("timestamp")),
    }
}

/// A query needs a device before its window is even looked at.
pub fn require_device_id(device_id: Option<&str>) -> Result<&str, ValidationError> {
    device_id
        .filter(|device_id| !device_id.is_empty())
        .ok_or(ValidationError::MissingParameter("device_id"))
}
