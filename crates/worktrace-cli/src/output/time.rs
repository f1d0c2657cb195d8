use chrono::{DateTime, Utc};

/// Format a millisecond total as "45s", "12m 30s", or "2h 05m".
pub fn format_ms(ms: i64) -> String {
    let seconds = ms / 1000;
    if seconds < 60 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m {:02}s", minutes, seconds % 60);
    }

    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Relative time against the wall clock ("just now", "5 min ago"),
/// falling back to the date once it stops reading naturally.
pub fn format_relative(ts: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(ts);

    let seconds = duration.num_seconds();
    let minutes = duration.num_minutes();
    let hours = duration.num_hours();
    let days = duration.num_days();

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_ms_seconds() {
        assert_eq!(format_ms(0), "0s");
        assert_eq!(format_ms(45_000), "45s");
    }

    #[test]
    fn test_format_ms_minutes() {
        assert_eq!(format_ms(125_000), "2m 05s");
    }

    #[test]
    fn test_format_ms_hours() {
        assert_eq!(format_ms(3_720_000), "1h 02m");
    }

    #[test]
    fn test_format_ms_truncates_sub_second() {
        assert_eq!(format_ms(999), "0s");
    }

    #[test]
    fn test_format_relative_recent() {
        assert_eq!(format_relative(Utc::now()), "just now");
    }

    #[test]
    fn test_format_relative_minutes() {
        let ts = Utc::now() - Duration::minutes(5);
        assert_eq!(format_relative(ts), "5 min ago");
    }
}
