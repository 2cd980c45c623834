use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601-like timestamp.
///
/// Accepts `T` or space separators, any fractional-second precision chrono supports, and `Z`,
/// `+HH:MM`, `+HHMM` or `+HH` offsets. Naive values are read as UTC; bare dates as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    let normalized = normalize_offset(s);
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(dt);
        }
    }

    let utc = FixedOffset::east_opt(0)?;
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().with_timezone(&utc));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().with_timezone(&utc))
}

/// Rewrite a trailing `Z` or two-digit `+HH` offset into `+HH:MM` form.
fn normalize_offset(s: &str) -> String {
    if let Some(stripped) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        return format!("{stripped}+00:00");
    }

    let bytes = s.as_bytes();
    let len = bytes.len();
    if len > 3 {
        let sign = bytes[len - 3];
        let time_before = bytes[len - 4].is_ascii_digit();
        if (sign == b'+' || sign == b'-')
            && time_before
            && bytes[len - 2..].iter().all(u8::is_ascii_digit)
            && s.get(..len - 3).is_some_and(|head| head.contains(':'))
        {
            return format!("{s}:00");
        }
    }
    s.to_string()
}
