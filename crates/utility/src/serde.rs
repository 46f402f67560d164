pub mod date_time {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize as _, Deserializer, Serializer};

    /// Formats an instant as RFC-3339 in UTC with whole seconds, e.g.
    /// `2024-05-01T12:30:00Z`.
    pub fn format_utc(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn serialize_utc<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_utc(value))
    }

    /// Accepts any RFC-3339 timestamp, whatever its offset, and normalizes it
    /// to UTC. `null` and a missing field both yield `None`.
    pub fn deserialize_rfc3339_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|value| Some(value.with_timezone(&Utc)))
                .map_err(Error::custom),
            None => Ok(None),
        }
    }
}

pub mod date {
    use chrono::NaiveDate;

    pub const FORMAT: &str = "%Y-%m-%d";

    /// Parses a calendar date in the strict `YYYY-MM-DD` form. chrono on its
    /// own also accepts unpadded months and days, which are rejected here.
    pub fn parse_yyyy_mm_dd(value: &str) -> Option<NaiveDate> {
        let bytes = value.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        if !bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
        {
            return None;
        }
        NaiveDate::parse_from_str(value, FORMAT).ok()
    }
}
