use chrono::{DateTime, FixedOffset};

/// Show times as listed on venue, artist and show pages, e.g.
/// `Monday May, 21, 2035 at 9:30PM`. The stored offset is kept.
pub fn format_datetime(value: DateTime<FixedOffset>) -> String {
    value.format("%A %B, %-d, %Y at %-I:%M%p").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::format_datetime;

    #[test]
    fn spells_out_day_and_month() {
        let value = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2035, 5, 21, 21, 30, 0)
            .single()
            .expect("timestamp should be valid");

        assert_eq!(format_datetime(value), "Monday May, 21, 2035 at 9:30PM");
    }

    #[test]
    fn keeps_the_stored_offset() {
        let value = FixedOffset::west_opt(7 * 3600)
            .expect("offset should be valid")
            .with_ymd_and_hms(2035, 4, 1, 8, 5, 0)
            .single()
            .expect("timestamp should be valid");

        assert_eq!(format_datetime(value), "Sunday April, 1, 2035 at 8:05AM");
    }
}
