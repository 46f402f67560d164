use chrono::{DateTime, Utc};

/// The time restriction of a trajectory query.
///
/// `Range` is half-open: `start` is included, `end` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Unbounded,
}

impl TimeWindow {
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::Range { start, end }
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Range { start, .. } => Some(*start),
            Self::Unbounded => None,
        }
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Range { end, .. } => Some(*end),
            Self::Unbounded => None,
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        match self {
            Self::Range { start, end } => start <= instant && instant < end,
            Self::Unbounded => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::TimeWindow;

    #[test]
    fn range_is_half_open() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(1);
        let window = TimeWindow::range(start, end);

        assert!(window.contains(&start));
        assert!(window.contains(&(end - Duration::seconds(1))));
        assert!(!window.contains(&end));
        assert!(!window.contains(&(start - Duration::seconds(1))));
    }

    #[test]
    fn unbounded_contains_everything() {
        let window = TimeWindow::Unbounded;
        assert!(window.contains(&Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(window.start(), None);
        assert_eq!(window.end(), None);
    }
}
