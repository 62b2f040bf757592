//! Human-readable time strings for post cards and comment rows.
//!
//! Both functions floor, never round, so "1h 59m" stays "1h 59m" and a
//! 59-second-old comment is still "just now".

use chrono::{DateTime, Utc};

/// Countdown until a post expires: "Xh Ym left", "Xh left", "Xm left",
/// or "Expired" once `expires_at` has passed.
pub fn time_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = expires_at - now;
    if diff.num_seconds() <= 0 {
        return "Expired".to_string();
    }

    let minutes = diff.num_minutes();
    let hours = minutes / 60;

    if hours >= 1 {
        let remaining_min = minutes % 60;
        if remaining_min > 0 {
            format!("{hours}h {remaining_min}m left")
        } else {
            format!("{hours}h left")
        }
    } else {
        format!("{minutes}m left")
    }
}

/// Age of a post or comment: "just now", "Xm ago", "Xh ago", or "Xd ago".
pub fn format_relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now - created_at;
    let seconds = age.num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 60 * 60 {
        format!("{}m ago", age.num_minutes())
    } else if seconds < 24 * 60 * 60 {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2026-08-30T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn remaining_expired_in_the_past() {
        let t = now();
        assert_eq!(time_remaining(t - Duration::seconds(30), t), "Expired");
        assert_eq!(time_remaining(t, t), "Expired");
    }

    #[test]
    fn remaining_hours_and_minutes() {
        let t = now();
        assert_eq!(time_remaining(t + Duration::minutes(90), t), "1h 30m left");
        assert_eq!(
            time_remaining(t + Duration::hours(47) + Duration::minutes(59), t),
            "47h 59m left"
        );
    }

    #[test]
    fn remaining_whole_hours_drop_minutes() {
        let t = now();
        assert_eq!(time_remaining(t + Duration::hours(2), t), "2h left");
    }

    #[test]
    fn remaining_under_an_hour() {
        let t = now();
        assert_eq!(time_remaining(t + Duration::minutes(45), t), "45m left");
        // Sub-minute remainders floor to zero minutes.
        assert_eq!(time_remaining(t + Duration::seconds(40), t), "0m left");
    }

    #[test]
    fn relative_just_now() {
        let t = now();
        assert_eq!(format_relative_time(t - Duration::seconds(30), t), "just now");
        assert_eq!(format_relative_time(t - Duration::seconds(59), t), "just now");
    }

    #[test]
    fn relative_minutes_hours_days() {
        let t = now();
        assert_eq!(format_relative_time(t - Duration::minutes(5), t), "5m ago");
        assert_eq!(format_relative_time(t - Duration::minutes(59), t), "59m ago");
        assert_eq!(format_relative_time(t - Duration::hours(23), t), "23h ago");
        assert_eq!(format_relative_time(t - Duration::hours(25), t), "1d ago");
        assert_eq!(format_relative_time(t - Duration::days(9), t), "9d ago");
    }
}
