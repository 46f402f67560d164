use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use utility::serde::date_time;

use crate::ExampleData;

/// A single reported device location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Ingestion payload as pushed by the device (Home Assistant push format).
///
/// Every field is optional on the wire and `null` counts as absent. A missing
/// `device_id` decodes to the empty string and missing coordinates decode to
/// `0.0`, so that presence is checked by the ingestion validator rather than
/// by the decoder.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TrackRequest {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub device_id: String,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub latitude: f64,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub longitude: f64,

    /// RFC-3339 timestamp, any offset.
    #[serde(
        deserialize_with = "date_time::deserialize_rfc3339_option",
        default
    )]
    #[schemars(with = "Option<DateTime<Utc>>")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExampleData for TrackRequest {
    fn example_data() -> Self {
        Self {
            device_id: "device_tracker.phone".to_owned(),
            latitude: 54.3233,
            longitude: 10.1228,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).single(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fields_decode_as_absent() {
        let request: TrackRequest = serde_json::from_str(
            r#"{"device_id": null, "latitude": null, "longitude": 2.5, "timestamp": null}"#,
        )
        .unwrap();

        assert_eq!(request.device_id, "");
        assert_eq!(request.latitude, 0.0);
        assert_eq!(request.longitude, 2.5);
        assert_eq!(request.timestamp, None);
    }

    #[test]
    fn wrongly_typed_fields_are_still_rejected() {
        assert!(serde_json::from_str::<TrackRequest>(r#"{"device_id": 5}"#).is_err());
        assert!(serde_json::from_str::<TrackRequest>(r#"{"latitude": "north"}"#).is_err());
    }
}
