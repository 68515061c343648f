//! Raw row values

use std::fmt;

/// A value as supplied in a data row, before numeric coercion
///
/// Rows arrive from forms and imports, so numbers are frequently carried as
/// text ("12,5", "07:30"). [`RawValue::as_number`] turns any of these into the
/// number a formula sees.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawValue {
    /// Missing or null value
    #[default]
    Empty,

    /// Boolean flag (counts as 1/0)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// Numeric-like text
    Text(String),
}

impl RawValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        RawValue::Text(s.into())
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerce to a finite number; anything unreadable becomes 0
    pub fn as_number(&self) -> f64 {
        let n = match self {
            RawValue::Empty => 0.0,
            RawValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            RawValue::Number(n) => *n,
            RawValue::Text(s) => parse_numeric_text(s),
        };

        if n.is_finite() {
            n
        } else {
            0.0
        }
    }
}

/// Read a number out of free-form text
///
/// Accepts, in order: a plain decimal, a clock time (`H:MM` or `HH:MM:SS`, as
/// decimal hours), a decimal comma, and finally the longest numeric prefix
/// (`"12 km"` is 12).
fn parse_numeric_text(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    if let Some(n) = parse_decimal(text) {
        return n;
    }

    if let Some(hours) = parse_clock_time(text) {
        return hours;
    }

    if text.contains(',') && !text.contains('.') {
        if let Some(n) = parse_decimal(&text.replacen(',', ".", 1)) {
            return n;
        }
    }

    parse_decimal(numeric_prefix(text)).unwrap_or(0.0)
}

/// Strict decimal: optional sign, digits, optional fraction. No exponents or
/// `inf`/`NaN` spellings.
fn parse_decimal(text: &str) -> Option<f64> {
    let digits = text.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(text);
    if digits.is_empty() || !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.') || digits.matches('.').count() > 1
    {
        return None;
    }
    text.parse().ok()
}

fn parse_clock_time(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = match parts.get(2) {
        Some(s) => s.parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }

    Some(hours + minutes / 60.0 + seconds / 3600.0)
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac > end + 1 {
            end = frac;
        }
    }

    &text[..end]
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Empty => Ok(()),
            RawValue::Boolean(b) => write!(f, "{}", b),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Boolean(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(RawValue::Number(42.5).as_number(), 42.5);
        assert_eq!(RawValue::Number(-3.0).as_number(), -3.0);
        assert_eq!(RawValue::Empty.as_number(), 0.0);
        assert_eq!(RawValue::Boolean(true).as_number(), 1.0);
    }

    #[test]
    fn test_non_finite_numbers_become_zero() {
        assert_eq!(RawValue::Number(f64::NAN).as_number(), 0.0);
        assert_eq!(RawValue::Number(f64::INFINITY).as_number(), 0.0);
        assert_eq!(RawValue::text("NaN").as_number(), 0.0);
        assert_eq!(RawValue::text("inf").as_number(), 0.0);
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(RawValue::text("12").as_number(), 12.0);
        assert_eq!(RawValue::text(" 12.75 ").as_number(), 12.75);
        assert_eq!(RawValue::text("-4").as_number(), -4.0);
        assert_eq!(RawValue::text("3,5").as_number(), 3.5);
        assert_eq!(RawValue::text("12 km").as_number(), 12.0);
        assert_eq!(RawValue::text("").as_number(), 0.0);
        assert_eq!(RawValue::text("chauffeur").as_number(), 0.0);
    }

    #[test]
    fn test_clock_times_are_decimal_hours() {
        assert_eq!(RawValue::text("07:30").as_number(), 7.5);
        assert_eq!(RawValue::text("16:45").as_number(), 16.75);
        assert_eq!(RawValue::text("0:15:00").as_number(), 0.25);
        // Minutes out of range is not a clock time; falls back to the prefix
        assert_eq!(RawValue::text("7:75").as_number(), 7.0);
    }

    #[test]
    fn test_is_empty() {
        assert!(RawValue::Empty.is_empty());
        assert!(RawValue::text("  ").is_empty());
        assert!(!RawValue::Number(0.0).is_empty());
        assert!(RawValue::from(None::<f64>).is_empty());
    }
}
