use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Calendar date of `instant` in the user's (or business) time zone
///
/// Dates are submitted as plain `yyyy-MM-dd`, so an instant picked late in
/// the evening must not roll over to the next UTC day.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today in `tz`
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_uses_time_zone() {
        // 2024-03-02 02:30 UTC is still March 1st in Los Angeles
        let instant = Utc.with_ymd_and_hms(2024, 3, 2, 2, 30, 0).unwrap();
        assert_eq!(
            local_date(instant, chrono_tz::America::Los_Angeles),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            local_date(instant, chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn test_now_millis_is_recent() {
        assert!(now_millis() > 1_700_000_000_000);
    }
}
