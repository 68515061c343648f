//! Math functions

use super::arg;

/// SUM(number1, ...) - Sum of all arguments
pub fn fn_sum(args: &[f64]) -> f64 {
    args.iter().sum()
}

/// AVERAGE(number1, ...) - Arithmetic mean, 0 without arguments
pub fn fn_average(args: &[f64]) -> f64 {
    if args.is_empty() {
        return 0.0;
    }
    fn_sum(args) / args.len() as f64
}

/// MIN(number1, ...) - Smallest argument, 0 without arguments
pub fn fn_min(args: &[f64]) -> f64 {
    args.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// MAX(number1, ...) - Largest argument, 0 without arguments
pub fn fn_max(args: &[f64]) -> f64 {
    args.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// ABS(number) - Absolute value
pub fn fn_abs(args: &[f64]) -> f64 {
    arg(args, 0).abs()
}

/// ROUND(number, [digits]) - Round half away from zero
pub fn fn_round(args: &[f64]) -> f64 {
    round_with(arg(args, 0), arg(args, 1), f64::round)
}

/// ROUNDUP / CEILING(number, [digits]) - Ceiling at the given number of decimals
pub fn fn_roundup(args: &[f64]) -> f64 {
    round_with(arg(args, 0), arg(args, 1), f64::ceil)
}

/// ROUNDDOWN / FLOOR(number, [digits]) - Floor at the given number of decimals
pub fn fn_rounddown(args: &[f64]) -> f64 {
    round_with(arg(args, 0), arg(args, 1), f64::floor)
}

/// Apply `op` at `digits` decimal granularity. Negative digits round to the
/// left of the decimal point.
fn round_with(number: f64, digits: f64, op: fn(f64) -> f64) -> f64 {
    if digits.is_nan() {
        return op(number);
    }

    // Beyond ~308 digits the scale itself overflows
    let digits = digits.trunc().clamp(-308.0, 308.0) as i32;
    if digits >= 0 {
        let scale = 10_f64.powi(digits);
        op(number * scale) / scale
    } else {
        let scale = 10_f64.powi(-digits);
        op(number / scale) * scale
    }
}

/// INT / TRUNC(number) - Truncate toward zero
pub fn fn_trunc(args: &[f64]) -> f64 {
    arg(args, 0).trunc()
}

/// MOD(number, divisor) - Remainder with the sign of the number, 0 for a zero
/// divisor
pub fn fn_mod(args: &[f64]) -> f64 {
    let divisor = arg(args, 1);
    if divisor == 0.0 {
        return 0.0;
    }
    arg(args, 0) % divisor
}

/// POWER(number, power)
pub fn fn_power(args: &[f64]) -> f64 {
    arg(args, 0).powf(arg(args, 1))
}

/// SQRT(number) - NaN for negative input
pub fn fn_sqrt(args: &[f64]) -> f64 {
    arg(args, 0).sqrt()
}

/// SIGN(number) - -1, 0 or 1
pub fn fn_sign(args: &[f64]) -> f64 {
    let n = arg(args, 0);
    if n == 0.0 || n.is_nan() {
        n
    } else {
        n.signum()
    }
}

/// PI()
pub fn fn_pi(_args: &[f64]) -> f64 {
    std::f64::consts::PI
}

/// LOG(number, [base]) - Logarithm, base 10 by default
pub fn fn_log(args: &[f64]) -> f64 {
    let base = args.get(1).copied().unwrap_or(10.0);
    arg(args, 0).log(base)
}

/// LOG10(number)
pub fn fn_log10(args: &[f64]) -> f64 {
    arg(args, 0).log10()
}

/// LN(number) - Natural logarithm
pub fn fn_ln(args: &[f64]) -> f64 {
    arg(args, 0).ln()
}

/// EXP(number)
pub fn fn_exp(args: &[f64]) -> f64 {
    arg(args, 0).exp()
}

/// PRODUCT(number1, ...) - Product of all arguments, 0 without arguments
pub fn fn_product(args: &[f64]) -> f64 {
    if args.is_empty() {
        return 0.0;
    }
    args.iter().product()
}
