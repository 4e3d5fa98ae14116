// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Display formatting for explorer values

use chrono::{DateTime, Utc};
use url::Url;

const SERIAL_RANGE_SEPARATOR: char = '\u{2013}';

/// Format an integer with comma thousands separators: `1000000` -> `1,000,000`
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

/// Format large numbers with K/M/B suffixes and one decimal place
#[allow(clippy::cast_precision_loss)]
pub fn format_compact_number(value: u64) -> String {
    let v = value as f64;
    if v >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        value.to_string()
    }
}

/// `value / total` as a percentage with one decimal, `"0%"` when `total` is zero
///
/// Ties round up, so `1 / 16` is `6.3%`.
pub fn format_percentage(value: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    // twentieths of a percent, then halved with the remainder rounding up
    let tenths = (u128::from(value) * 2000 / u128::from(total) + 1) / 2;
    format!("{}.{}%", tenths / 10, tenths % 10)
}

/// `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Coarse relative time such as `3 days ago` or `in an hour`
pub fn format_relative_time(date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(*date);
    let secs = delta.num_seconds().unsigned_abs();
    let minutes = (secs + 30) / 60;
    let hours = (secs + 1800) / 3600;
    let days = (secs + 43_200) / 86_400;

    let phrase = if secs < 45 {
        "a few seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes")
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{hours} hours")
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{days} days")
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", (days * 10 + 152) / 304)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days + 182) / 365)
    };

    if delta.num_seconds() < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

/// Inclusive serial range, e.g. `1,000,001–1,001,000`
pub fn format_serial_range(start: u64, end: u64) -> String {
    format!(
        "{}{SERIAL_RANGE_SEPARATOR}{}",
        format_number(start),
        format_number(end)
    )
}

/// Keep the first and last `length` characters of a hash
pub fn truncate_hash(hash: &str, length: usize) -> String {
    let count = hash.chars().count();
    if count <= length * 2 {
        return hash.to_string();
    }
    let head: String = hash.chars().take(length).collect();
    let tail: String = hash.chars().skip(count - length).collect();
    format!("{head}...{tail}")
}

/// Normalise `url` if it is an absolute http(s) URL
pub fn sanitize_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}
