use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Parses a date (`YYYY-MM-DD`) or an ISO-8601 timestamp into a zone-less instant.
///
/// A bare date resolves to midnight, or to 23:59:59 when `end_of_day` is set. A trailing `Z` or explicit offset is
/// dropped and the wall-clock time kept.
pub fn parse_timestamp(s: &str, end_of_day: bool) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.len() == 10 {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        let time = if end_of_day { NaiveTime::from_hms_opt(23, 59, 59) } else { NaiveTime::from_hms_opt(0, 0, 0) }?;
        return Some(date.and_time(time));
    }
    let s = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Some(dt.naive_local());
        }
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
}

pub fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}
