use chrono::{DateTime, Local, Utc};

/// Wall-clock time shown next to chat messages.
#[must_use]
pub fn format_message_time(value: DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%H:%M").to_string()
}

#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Integer with thousands separators, e.g. `15,420`.
#[must_use]
pub fn format_count(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::time::fixed_now;

    #[test]
    fn minutes_are_grouped_into_hours() {
        assert_eq!(format_minutes(0), "0 min");
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(270), "4h 30m");
    }

    #[test]
    fn counts_use_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(8900), "8,900");
        assert_eq!(format_count(15420), "15,420");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn message_time_is_hours_and_minutes() {
        let label = format_message_time(fixed_now());
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }
}
