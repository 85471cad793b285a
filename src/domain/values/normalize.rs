//! Lenient parsing of provider-supplied numeric strings.
//!
//! Providers encode numbers as strings (`"2.53"`, `"109.0909%"`, `"164000"`).
//! A malformed value must never abort a batch, so every parser here falls back
//! to zero instead of returning an error.

/// `"5.4201%"` -> `5.4201`. Malformed input yields `0.0`.
pub fn parse_percentage(s: &str) -> f64 {
    parse_float(&s.replace('%', ""))
}

/// `"50.57"` -> `50.57`. Malformed or non-finite input yields `0.0`.
pub fn parse_float(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `"12345"` -> `12345`. Malformed input yields `0`.
pub fn parse_int(s: &str) -> i64 {
    s.trim().parse::<i64>().unwrap_or(0)
}
