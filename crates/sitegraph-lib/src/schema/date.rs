//! Date detection and moment-style formatting.
//!
//! Only English month and weekday names are available; other locales fall
//! back to them.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Longest tokens first so `MMMM` wins over `MM`.
const TOKENS: [&str; 23] = [
    "YYYY", "MMMM", "dddd", "SSS", "MMM", "ddd", "YY", "MM", "Do", "DD", "HH", "hh", "mm", "ss",
    "M", "D", "H", "h", "m", "s", "A", "a", "X",
];

/// ISO 8601 dates: `2019-01-31`, `2019-01-31T10:00:00`, with optional
/// fraction and offset. Offsets are normalized to UTC.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let bytes = text.as_bytes();
    if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn is_date(text: &str) -> bool {
    parse_date(text).is_some()
}

/// Format with moment tokens. Text in `[brackets]` is copied verbatim, as is
/// anything that is not a token.
pub fn format_date(dt: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '['
            && let Some(end) = rest.find(']')
        {
            out.push_str(&rest[1..end]);
            rest = &rest[end + 1..];
            continue;
        }
        if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str(&render_token(dt, token));
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn render_token(dt: &NaiveDateTime, token: &str) -> String {
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    match token {
        "YYYY" => format!("{:04}", dt.year()),
        "YY" => format!("{:02}", dt.year().rem_euclid(100)),
        "MMMM" => MONTHS[dt.month0() as usize].to_owned(),
        "MMM" => MONTHS[dt.month0() as usize][..3].to_owned(),
        "MM" => format!("{:02}", dt.month()),
        "M" => dt.month().to_string(),
        "Do" => ordinal(dt.day()),
        "DD" => format!("{:02}", dt.day()),
        "D" => dt.day().to_string(),
        "dddd" => WEEKDAYS[dt.weekday().num_days_from_monday() as usize].to_owned(),
        "ddd" => WEEKDAYS[dt.weekday().num_days_from_monday() as usize][..3].to_owned(),
        "HH" => format!("{:02}", dt.hour()),
        "H" => dt.hour().to_string(),
        "hh" => format!("{:02}", hour12),
        "h" => hour12.to_string(),
        "mm" => format!("{:02}", dt.minute()),
        "m" => dt.minute().to_string(),
        "ss" => format!("{:02}", dt.second()),
        "s" => dt.second().to_string(),
        "SSS" => format!("{:03}", dt.nanosecond() / 1_000_000),
        "A" => if dt.hour() < 12 { "AM" } else { "PM" }.to_owned(),
        "a" => if dt.hour() < 12 { "am" } else { "pm" }.to_owned(),
        "X" => dt.and_utc().timestamp().to_string(),
        _ => token.to_owned(),
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
