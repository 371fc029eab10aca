use chrono::{Local, NaiveDate, NaiveDateTime};

/// Events starting within this many hours are urgent.
pub const URGENT_WINDOW_HOURS: f64 = 48.0;

const DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses a local datetime as entered in the questionnaire. A bare date means midnight.
pub fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Hours between `now` and the event, negative for past events.
pub fn hours_until(event_date_time: &str, now: NaiveDateTime) -> Option<f64> {
    let target = parse_local_datetime(event_date_time)?;
    Some((target - now).num_seconds() as f64 / 3600.0)
}

pub fn is_urgent_at(event_date_time: &str, now: NaiveDateTime) -> bool {
    // Past events are stale, not urgent.
    hours_until(event_date_time, now)
        .map(|hours| hours > 0.0 && hours <= URGENT_WINDOW_HOURS)
        .unwrap_or(false)
}

pub fn is_urgent(event_date_time: &str) -> bool {
    is_urgent_at(event_date_time, Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

    use super::{hours_until, is_urgent, is_urgent_at, parse_local_datetime};

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 12)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .expect("valid fixture datetime")
    }

    fn form_value(at: NaiveDateTime) -> String {
        at.format("%Y-%m-%dT%H:%M").to_string()
    }

    #[test]
    fn empty_input_is_not_urgent() {
        assert!(!is_urgent(""));
        assert!(!is_urgent("   "));
    }

    #[test]
    fn relative_offsets_from_the_local_clock() {
        let now = Local::now().naive_local();
        assert!(is_urgent(&form_value(now + Duration::hours(10))));
        assert!(!is_urgent(&form_value(now + Duration::hours(72))));
        assert!(!is_urgent(&form_value(now - Duration::hours(1))));
    }

    #[test]
    fn window_is_inclusive_at_forty_eight_hours() {
        let now = fixed_now();
        assert!(is_urgent_at(&form_value(now + Duration::hours(48)), now));
        assert!(!is_urgent_at(&form_value(now + Duration::hours(48) + Duration::minutes(1)), now));
        assert!(!is_urgent_at(&form_value(now), now));
    }

    #[test]
    fn accepts_seconds_space_separator_and_bare_dates() {
        let now = fixed_now();
        assert!(is_urgent_at("2026-06-13T09:00:30", now));
        assert!(is_urgent_at("2026-06-13 09:00", now));
        assert!(is_urgent_at("2026-06-14", now));
        assert_eq!(hours_until("2026-06-13", now), Some(9.5));
    }

    #[test]
    fn malformed_dates_are_not_urgent() {
        let now = fixed_now();
        for input in ["tomorrow", "2026-13-01T10:00", "13/06/2026", "2026-06-13T25:00"] {
            assert!(!is_urgent_at(input, now), "{input}");
            assert_eq!(parse_local_datetime(input), None, "{input}");
        }
    }
}
