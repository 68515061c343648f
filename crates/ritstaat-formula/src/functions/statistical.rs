//! Statistical functions

use super::is_truthy;

/// COUNT / COUNTA(value1, ...) - Number of arguments that are nonzero and not
/// NaN
///
/// Arguments are already numbers, so an empty cell and a zero look the same
/// and neither is counted.
pub fn fn_count(args: &[f64]) -> f64 {
    args.iter().filter(|&&v| is_truthy(v)).count() as f64
}

/// MEDIAN(number1, ...) - Middle value, 0 without arguments
pub fn fn_median(args: &[f64]) -> f64 {
    let mut values: Vec<f64> = args.iter().copied().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
