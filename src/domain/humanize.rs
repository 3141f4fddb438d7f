//! Relative time formatting ("3 minutes ago") for `*_at` columns

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::domain::DomainError;

/// Parse a service timestamp. Timestamps without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::InvalidTimestamp(raw.to_string()))
}

/// Describe `then` relative to `now`: "now", "5 minutes ago", "a day from now".
pub fn natural_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta < Duration::zero();
    let text = natural_delta(delta.num_seconds().unsigned_abs());
    match text {
        None => "now".to_string(),
        Some(text) if future => format!("{text} from now"),
        Some(text) => format!("{text} ago"),
    }
}

/// Convenience wrapper used by table rendering.
pub fn time_since(raw: &str) -> Result<String, DomainError> {
    Ok(natural_time(parse_timestamp(raw)?, Utc::now()))
}

/// `None` means "a moment".
fn natural_delta(total_seconds: u64) -> Option<String> {
    const DAY: u64 = 86_400;
    let total_days = total_seconds / DAY;
    let seconds = total_seconds % DAY;
    let years = total_days / 365;
    let days = total_days % 365;
    let months = (days as f64 / 30.5) as u64;

    let text = match years {
        0 if days == 0 => match seconds {
            0 => return None,
            1 => "a second".to_string(),
            2..=59 => format!("{seconds} seconds"),
            60..=119 => "a minute".to_string(),
            120..=3599 => format!("{} minutes", seconds / 60),
            3600..=7199 => "an hour".to_string(),
            _ => format!("{} hours", seconds / 3600),
        },
        0 => match (days, months) {
            (1, _) => "a day".to_string(),
            (_, 0) => format!("{days} days"),
            (_, 1) => "a month".to_string(),
            _ => format!("{months} months"),
        },
        1 => match (days, months) {
            (0, _) => "a year".to_string(),
            (1, 0) => "1 year, 1 day".to_string(),
            (_, 0) => format!("1 year, {days} days"),
            (_, 1) => "1 year, 1 month".to_string(),
            _ => format!("1 year, {months} months"),
        },
        _ => format!("{years} years"),
    };
    Some(text)
}
