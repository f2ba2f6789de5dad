//! Time helpers

use chrono_tz::Tz;

/// Parse an IANA time zone name such as `America/New_York`
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}
