use chrono::{Duration, NaiveDateTime};

/// Clock-time label for a freshly composed message.
pub fn compose_time(now: NaiveDateTime) -> String {
    now.format("%H:%M").to_string()
}

/// Relative last-activity label for chat rows.
///
/// Today shows the clock time, yesterday shows "Yesterday", anything
/// within the last week shows the weekday name, older shows `dd/mm`.
pub fn last_activity_label(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    if ts.date() == now.date() {
        return ts.format("%H:%M").to_string();
    }
    if let Some(yesterday) = now.date().pred_opt()
        && ts.date() == yesterday
    {
        return "Yesterday".to_owned();
    }
    if now.signed_duration_since(ts) < Duration::days(7) {
        return ts.format("%A").to_string();
    }
    ts.format("%d/%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    #[test]
    fn formats_compose_time_as_clock() {
        assert_eq!(compose_time(at(2025, 3, 14, 9, 5)), "09:05");
    }

    #[test]
    fn same_day_shows_clock_time() {
        let now = at(2025, 3, 14, 18, 0);
        assert_eq!(last_activity_label(at(2025, 3, 14, 10, 30), now), "10:30");
    }

    #[test]
    fn previous_day_shows_yesterday() {
        let now = at(2025, 3, 14, 18, 0);
        assert_eq!(last_activity_label(at(2025, 3, 13, 23, 59), now), "Yesterday");
    }

    #[test]
    fn within_a_week_shows_weekday() {
        let now = at(2025, 3, 14, 18, 0);
        // 2025-03-10 is a Monday.
        assert_eq!(last_activity_label(at(2025, 3, 10, 12, 0), now), "Monday");
    }

    #[test]
    fn older_shows_day_and_month() {
        let now = at(2025, 3, 14, 18, 0);
        assert_eq!(last_activity_label(at(2025, 2, 1, 12, 0), now), "01/02");
    }
}
