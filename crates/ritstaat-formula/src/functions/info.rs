//! Information functions

use super::{arg, from_bool};

/// ISBLANK(value) - 1 when the value is missing or 0
pub fn fn_isblank(args: &[f64]) -> f64 {
    from_bool(args.first().map_or(true, |&v| v == 0.0))
}

/// ISNUMBER(value) - 1 when the value is present and not NaN
pub fn fn_isnumber(args: &[f64]) -> f64 {
    from_bool(args.first().map_or(false, |v| !v.is_nan()))
}

/// ISEVEN(number) - Fractions are truncated first
pub fn fn_iseven(args: &[f64]) -> f64 {
    from_bool(arg(args, 0).trunc() % 2.0 == 0.0)
}

/// ISODD(number) - Fractions are truncated first
pub fn fn_isodd(args: &[f64]) -> f64 {
    from_bool(arg(args, 0).trunc().abs() % 2.0 == 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isblank_and_isnumber() {
        assert_eq!(fn_isblank(&[]), 1.0);
        assert_eq!(fn_isblank(&[0.0]), 1.0);
        assert_eq!(fn_isblank(&[4.0]), 0.0);
        assert_eq!(fn_isnumber(&[0.0]), 1.0);
        assert_eq!(fn_isnumber(&[f64::NAN]), 0.0);
        assert_eq!(fn_isnumber(&[]), 0.0);
    }

    #[test]
    fn test_parity() {
        assert_eq!(fn_iseven(&[4.0]), 1.0);
        assert_eq!(fn_iseven(&[4.9]), 1.0);
        assert_eq!(fn_iseven(&[-3.0]), 0.0);
        assert_eq!(fn_isodd(&[-3.0]), 1.0);
        assert_eq!(fn_isodd(&[2.0]), 0.0);
        assert_eq!(fn_isodd(&[f64::NAN]), 0.0);
    }
}
