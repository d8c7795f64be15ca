//! Parsing of human-readable expiration durations

use crate::error::{Error, Result};

/// Multiplier in seconds for each supported unit suffix.
const UNITS: &[(char, u64)] = &[
    ('s', 1),
    ('m', 60),
    ('h', 3600),
    ('d', 86_400),
    ('w', 604_800),
];

/// Parse a duration string into a whole number of seconds.
///
/// The grammar is a non-negative decimal number followed by an optional
/// unit suffix. Supported suffixes (case-insensitive): `s` seconds,
/// `m` minutes, `h` hours, `d` days, `w` weeks. A bare number is taken
/// as seconds. Fractional values are truncated toward zero after unit
/// conversion, so `"1.5m"` is 90 and `"1.5s"` is 1.
///
/// # Example
/// ```
/// use kv_namespace_client::parse_duration;
///
/// assert_eq!(parse_duration("10m").unwrap(), 600);
/// assert_eq!(parse_duration("90").unwrap(), 90);
/// ```
pub fn parse_duration(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidTtl("empty duration".to_string()));
    }

    let (num_str, multiplier) = match s.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let lower = c.to_ascii_lowercase();
            let mult = UNITS
                .iter()
                .find(|(unit, _)| *unit == lower)
                .map(|(_, mult)| *mult)
                .ok_or_else(|| {
                    Error::InvalidTtl(format!("unknown unit suffix '{}' in '{}'", c, s))
                })?;
            (s[..s.len() - 1].trim(), mult)
        }
        _ => (s, 1),
    };

    let value: f64 = num_str
        .parse()
        .map_err(|_| Error::InvalidTtl(format!("invalid number in '{}'", s)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidTtl(format!(
            "duration must be a non-negative number: '{}'",
            s
        )));
    }

    Ok((value * multiplier as f64) as u64)
}
