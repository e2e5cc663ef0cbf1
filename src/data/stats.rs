//! Summary statistics over salary samples.
//!
//! Undefined results (empty sample, standard deviation of a single value,
//! percentage of zero rows) are `None`, never `0.0` or NaN.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Salary summary for one group of rows. Only built for non-empty groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n − 1). `None` when `count == 1`.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl SalaryStats {
    /// Summarise a sample; `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(SalaryStats {
            count: values.len(),
            mean: values.mean(),
            median: quantile_sorted(&sorted, 0.5),
            std_dev: sample_std_dev(values),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(BoxSummary {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Arithmetic mean; `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.mean())
    }
}

/// Sample standard deviation with the n − 1 divisor; `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sd = values.std_dev();
    sd.is_finite().then_some(sd)
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// `part / whole * 100`, undefined when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_sample_has_no_stats() {
        assert!(SalaryStats::from_values(&[]).is_none());
        assert!(BoxSummary::from_values(&[]).is_none());
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn single_value_has_undefined_spread() {
        let s = SalaryStats::from_values(&[42.0]).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let s = SalaryStats::from_values(&[50_000.0, 120_000.0]).unwrap();
        assert!(close(s.mean, 85_000.0));
        // sqrt(((35000^2) * 2) / 1)
        assert!((s.std_dev.unwrap() - 35_000.0 * 2f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn median_interpolates_even_samples() {
        let s = SalaryStats::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(close(s.median, 2.5));
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn box_summary_quartiles() {
        let b = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(close(b.q1, 2.0));
        assert!(close(b.median, 3.0));
        assert!(close(b.q3, 4.0));
    }

    #[test]
    fn percent_of_zero_is_undefined() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(1, 2), Some(50.0));
    }
}
