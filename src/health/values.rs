//! Value parsing for export attributes
//!
//! Every attribute arrives as a string. Numbers go through [`parse_numeric`]
//! and dates through the helpers here; anything that does not parse is
//! reported as such rather than coerced.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Outcome of parsing a numeric attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericField {
    /// Parsed finite number
    Value(f64),
    /// Attribute missing or empty
    Absent,
    /// Attribute present but not a number
    Unparseable,
}

impl NumericField {
    pub fn value(self) -> Option<f64> {
        match self {
            NumericField::Value(v) => Some(v),
            NumericField::Absent | NumericField::Unparseable => None,
        }
    }

    /// Parsed value, or `default` for absent and unparseable fields
    pub fn or(self, default: f64) -> f64 {
        self.value().unwrap_or(default)
    }
}

/// Parse a numeric attribute
///
/// Tolerant in the way export consumers expect: whitespace is trimmed and a
/// leading numeric prefix is accepted (`"12.5 km"` parses as 12.5).
pub fn parse_numeric(raw: Option<&str>) -> NumericField {
    let Some(raw) = raw.map(str::trim) else {
        return NumericField::Absent;
    };
    if raw.is_empty() {
        return NumericField::Absent;
    }

    let parsed = raw
        .parse::<f64>()
        .ok()
        .or_else(|| numeric_prefix(raw).and_then(|p| p.parse::<f64>().ok()));

    match parsed {
        Some(v) if v.is_finite() => NumericField::Value(v),
        _ => NumericField::Unparseable,
    }
}

/// Longest prefix shaped like a decimal number
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it has digits
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// Whether a date attribute falls in the target year
///
/// Pure prefix comparison on the first four characters, no calendar checks.
/// Missing or empty dates never match.
pub fn in_year(date: Option<&str>, year: &str) -> bool {
    match date {
        Some(d) if !d.is_empty() && !year.is_empty() => d.starts_with(year),
        _ => false,
    }
}

/// `YYYY-MM-DD` day key of a date string
pub fn day_key(date: &str) -> Option<&str> {
    date.get(0..10)
}

/// Month number (1-12) from the `MM` substring of a date string
pub fn month_of(date: &str) -> Option<u32> {
    let mm = date.get(5..7)?;
    if !mm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    mm.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
}

/// Parse a day key into a calendar date
pub fn parse_day(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Parse an export timestamp into its wall-clock date-time
///
/// Apple Health writes `2024-01-15 10:30:00 -0500`; the offset is the
/// device's zone at recording time, so the local reading is kept as-is.
pub fn parse_timestamp(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();

    if let Ok(dt) = DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_local());
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, fmt) {
            return Some(dt);
        }
    }

    parse_day(date).and_then(|d| d.and_hms_opt(0, 0, 0))
}
