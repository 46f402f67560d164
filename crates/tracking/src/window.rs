//! Turns the selectors of a path query into a single [`TimeWindow`].
//!
//! Selectors are checked in a fixed order and the first one present wins:
//! `all`, then `days`, then `date`, and with none of them the current UTC day.
//! `now` is captured once by the caller and passed in.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use model::{query::PathQuery, window::TimeWindow};
use utility::serde::date;

use crate::ValidationError;

pub fn resolve(query: &PathQuery, now: DateTime<Utc>) -> Result<TimeWindow, ValidationError> {
    if query.all().is_some_and(is_truthy) {
        return Ok(TimeWindow::Unbounded);
    }

    if let Some(days) = query.days() {
        return relative_days(days, now);
    }

    if let Some(value) = query.date() {
        let day = date::parse_yyyy_mm_dd(value)
            .ok_or(ValidationError::InvalidParameter("date"))?;
        return calendar_day(day).ok_or(ValidationError::InvalidParameter("date"));
    }

    calendar_day(now.date_naive()).ok_or(ValidationError::InvalidParameter("date"))
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value == "true"
}

/// `[now - days, now)`.
fn relative_days(value: &str, now: DateTime<Utc>) -> Result<TimeWindow, ValidationError> {
    let invalid = ValidationError::InvalidParameter("days");
    let days: i64 = value.parse().map_err(|_| invalid)?;
    if days <= 0 {
        return Err(invalid);
    }
    let start = Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(invalid)?;
    Ok(TimeWindow::range(start, now))
}

/// `[day 00:00Z, day+1 00:00Z)`.
fn calendar_day(day: NaiveDate) -> Option<TimeWindow> {
    let next = day.succ_opt()?;
    Some(TimeWindow::range(
        day.and_hms_opt(0, 0, 0)?.and_utc(),
        next.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 12).unwrap()
    }

    fn query(all: Option<&str>, days: Option<&str>, date: Option<&str>) -> PathQuery {
        PathQuery {
            device_id: Some("d1".to_owned()),
            all: all.map(str::to_owned),
            days: days.map(str::to_owned),
            date: date.map(str::to_owned),
        }
    }

    #[test]
    fn all_selects_unbounded_window() {
        for value in ["1", "true"] {
            assert_eq!(
                resolve(&query(Some(value), None, None), now()),
                Ok(TimeWindow::Unbounded)
            );
        }
    }

    #[test]
    fn all_takes_precedence_over_other_selectors() {
        assert_eq!(
            resolve(&query(Some("true"), Some("nope"), Some("bad")), now()),
            Ok(TimeWindow::Unbounded)
        );
    }

    #[test]
    fn falsy_all_falls_through() {
        let expected = TimeWindow::range(now() - Duration::days(3), now());
        for value in ["0", "false", "TRUE", "yes", ""] {
            assert_eq!(resolve(&query(Some(value), Some("3"), None), now()), Ok(expected));
        }
    }

    #[test]
    fn days_window_ends_now() {
        assert_eq!(
            resolve(&query(None, Some("7"), None), now()),
            Ok(TimeWindow::range(now() - Duration::days(7), now()))
        );
    }

    #[test]
    fn days_takes_precedence_over_date() {
        assert_eq!(
            resolve(&query(None, Some("1"), Some("2020-01-01")), now()),
            Ok(TimeWindow::range(now() - Duration::days(1), now()))
        );
    }

    #[test]
    fn days_must_be_strictly_positive_integer() {
        for value in ["0", "-1", "abc", "1.5", " 2", "99999999999999999999"] {
            assert_eq!(
                resolve(&query(None, Some(value), None), now()),
                Err(ValidationError::InvalidParameter("days")),
                "days={value}"
            );
        }
    }

    #[test]
    fn days_overflowing_the_calendar_is_invalid() {
        assert_eq!(
            resolve(&query(None, Some("9223372036854775807"), None), now()),
            Err(ValidationError::InvalidParameter("days"))
        );
    }

    #[test]
    fn date_covers_one_utc_day() {
        assert_eq!(
            resolve(&query(None, None, Some("2024-02-28")), now()),
            Ok(TimeWindow::range(
                Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap(),
            ))
        );
    }

    #[test]
    fn malformed_date_is_invalid() {
        for value in ["2024-13-01", "2024/05/01", "01-05-2024", "2024-5-1", "today"] {
            assert_eq!(
                resolve(&query(None, None, Some(value)), now()),
                Err(ValidationError::InvalidParameter("date")),
                "date={value}"
            );
        }
    }

    #[test]
    fn no_selector_means_today() {
        assert_eq!(
            resolve(&query(None, None, None), now()),
            resolve(&query(None, None, Some("2024-05-17")), now())
        );
    }

    #[test]
    fn empty_selectors_count_as_absent() {
        assert_eq!(
            resolve(&query(None, Some(""), Some("")), now()),
            resolve(&query(None, None, None), now())
        );
    }
}
