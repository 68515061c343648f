//! Financial functions

use super::arg;

/// PMT(rate, nper, pv) - Payment per period for a loan with constant
/// payments and a constant interest rate
///
/// With a zero rate the payment is `-pv / nper`; with no periods it is 0.
pub fn fn_pmt(args: &[f64]) -> f64 {
    let rate = arg(args, 0);
    let nper = arg(args, 1);
    let pv = arg(args, 2);

    if nper == 0.0 {
        return 0.0;
    }
    if rate == 0.0 {
        return -pv / nper;
    }

    let growth = (1.0 + rate).powf(nper);
    -(pv * rate * growth) / (growth - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmt() {
        // 10,000 over 12 months at 1% per month
        let payment = fn_pmt(&[0.01, 12.0, 10_000.0]);
        assert!((payment - -888.4878867834).abs() < 1e-6);
    }

    #[test]
    fn test_pmt_degenerate() {
        assert_eq!(fn_pmt(&[0.0, 4.0, 1000.0]), -250.0);
        assert_eq!(fn_pmt(&[0.05, 0.0, 1000.0]), 0.0);
        assert_eq!(fn_pmt(&[]), 0.0);
    }
}
