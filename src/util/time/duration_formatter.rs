use chrono::{DateTime, Utc};

/// Renders a duration as `1d 2h 3m 4s`, skipping leading zero units.
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}.{:03}s", duration.subsec_millis())
    }
}

pub fn format_dt_difference(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    match (to - from).to_std() {
        Ok(duration) => format_duration(duration),
        Err(_) => String::from("0.000s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1_250)), "1.250s");
        assert_eq!(format_duration(Duration::from_secs(61)), "1m 1s");
        assert_eq!(format_duration(Duration::from_secs(3_661)), "1h 1m 1s");
        assert_eq!(format_duration(Duration::from_secs(90_061)), "1d 1h 1m 1s");
    }

    #[test]
    fn test_negative_difference_is_zero() {
        let now = Utc::now();
        assert_eq!(
            format_dt_difference(now, now - chrono::Duration::seconds(5)),
            "0.000s"
        );
    }
}
