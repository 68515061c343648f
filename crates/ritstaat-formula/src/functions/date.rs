//! Date functions

use super::arg;

/// WEEKDAY(value) - Passes through a day number already in 1..=7, else 0
///
/// Templates only ever hand this a day number; no date serial is decoded.
// TODO: decode date serials once rows carry dates as numbers instead of text.
pub fn fn_weekday(args: &[f64]) -> f64 {
    let value = arg(args, 0);
    if (1.0..=7.0).contains(&value) {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_passthrough() {
        assert_eq!(fn_weekday(&[1.0]), 1.0);
        assert_eq!(fn_weekday(&[7.0]), 7.0);
        assert_eq!(fn_weekday(&[0.0]), 0.0);
        assert_eq!(fn_weekday(&[45_000.0]), 0.0);
        assert_eq!(fn_weekday(&[]), 0.0);
    }
}
