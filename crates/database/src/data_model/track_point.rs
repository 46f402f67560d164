use chrono::{DateTime, Utc};
use model::fix::Fix;
use sqlx::prelude::FromRow;

/// A stored fix.
/// Table: `track_points`
#[derive(Debug, Clone, FromRow)]
pub struct TrackPointRow {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl TrackPointRow {
    pub fn to_model(self) -> Fix {
        Fix {
            device_id: self.device_id,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.created_at,
        }
    }
}
