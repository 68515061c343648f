//! Logical functions and comparison helpers
//!
//! Results are 1 for true and 0 for false. A NaN condition counts as false.

use super::{arg, from_bool, is_truthy};

/// IF(condition, value_if_true, [value_if_false])
pub fn fn_if(args: &[f64]) -> f64 {
    if is_truthy(arg(args, 0)) {
        arg(args, 1)
    } else {
        arg(args, 2)
    }
}

/// IFERROR(value, fallback) - Fallback when the value is NaN
pub fn fn_iferror(args: &[f64]) -> f64 {
    let value = arg(args, 0);
    if value.is_nan() {
        arg(args, 1)
    } else {
        value
    }
}

/// AND(logical1, ...) - 1 when every argument is truthy
pub fn fn_and(args: &[f64]) -> f64 {
    from_bool(args.iter().all(|&v| is_truthy(v)))
}

/// OR(logical1, ...) - 1 when any argument is truthy
pub fn fn_or(args: &[f64]) -> f64 {
    from_bool(args.iter().any(|&v| is_truthy(v)))
}

/// NOT(logical)
pub fn fn_not(args: &[f64]) -> f64 {
    from_bool(!is_truthy(arg(args, 0)))
}

/// EQUAL(a, b)
pub fn fn_equal(args: &[f64]) -> f64 {
    from_bool(arg(args, 0) == arg(args, 1))
}

/// GT(a, b) - a > b
pub fn fn_gt(args: &[f64]) -> f64 {
    from_bool(arg(args, 0) > arg(args, 1))
}

/// GTE(a, b) - a >= b
pub fn fn_gte(args: &[f64]) -> f64 {
    from_bool(arg(args, 0) >= arg(args, 1))
}

/// LT(a, b) - a < b
pub fn fn_lt(args: &[f64]) -> f64 {
    from_bool(arg(args, 0) < arg(args, 1))
}

/// LTE(a, b) - a <= b
pub fn fn_lte(args: &[f64]) -> f64 {
    from_bool(arg(args, 0) <= arg(args, 1))
}

/// BETWEEN(value, low, high) - Inclusive range check
pub fn fn_between(args: &[f64]) -> f64 {
    let value = arg(args, 0);
    from_bool(arg(args, 1) <= value && value <= arg(args, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if() {
        assert_eq!(fn_if(&[1.0, 10.0, 20.0]), 10.0);
        assert_eq!(fn_if(&[0.0, 10.0, 20.0]), 20.0);
        assert_eq!(fn_if(&[-3.0, 10.0, 20.0]), 10.0);
        assert_eq!(fn_if(&[f64::NAN, 10.0, 20.0]), 20.0);
        assert_eq!(fn_if(&[0.0, 10.0]), 0.0);
    }

    #[test]
    fn test_iferror() {
        assert_eq!(fn_iferror(&[f64::NAN, 5.0]), 5.0);
        assert_eq!(fn_iferror(&[2.0, 5.0]), 2.0);
        // Only NaN falls back
        assert_eq!(fn_iferror(&[f64::INFINITY, 5.0]), f64::INFINITY);
    }

    #[test]
    fn test_and_or_not() {
        assert_eq!(fn_and(&[1.0, 2.0, -1.0]), 1.0);
        assert_eq!(fn_and(&[1.0, 0.0]), 0.0);
        assert_eq!(fn_and(&[]), 1.0);
        assert_eq!(fn_or(&[0.0, 0.0, 3.0]), 1.0);
        assert_eq!(fn_or(&[0.0, f64::NAN]), 0.0);
        assert_eq!(fn_or(&[]), 0.0);
        assert_eq!(fn_not(&[0.0]), 1.0);
        assert_eq!(fn_not(&[5.0]), 0.0);
    }

    #[test]
    fn test_comparison_helpers() {
        assert_eq!(fn_equal(&[2.0, 2.0]), 1.0);
        assert_eq!(fn_equal(&[2.0, 3.0]), 0.0);
        assert_eq!(fn_gt(&[3.0, 2.0]), 1.0);
        assert_eq!(fn_gte(&[2.0, 2.0]), 1.0);
        assert_eq!(fn_lt(&[3.0, 2.0]), 0.0);
        assert_eq!(fn_lte(&[2.0, 2.0]), 1.0);
        assert_eq!(fn_between(&[5.0, 1.0, 5.0]), 1.0);
        assert_eq!(fn_between(&[6.0, 1.0, 5.0]), 0.0);
    }
}
