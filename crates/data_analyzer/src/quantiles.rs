use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Linear interpolation between the order statistics bracketing
/// `p / 100 * (n - 1)`. Every quantile in this crate goes through here.
pub fn percentile(sample: &Sample, p: f64) -> Result<f64, AnalyzerError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(AnalyzerError::InvalidInput(format!(
            "percentile {p} is outside 0..=100"
        )));
    }
    Ok(percentile_sorted(sample.sorted(), p))
}

pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (n - 1) as f64;
    let lower = (rank.floor() as usize).min(n - 1);
    let upper = (lower + 1).min(n - 1);
    let weight = rank - lower as f64;
    let (lo, hi) = (sorted[lower], sorted[upper]);
    if weight == 0.0 || lo == hi {
        return lo;
    }
    // weighted form: `hi - lo` can exceed f64::MAX for finite brackets,
    // and rounding must not push the estimate past its bracket
    (lo * (1.0 - weight) + hi * weight).clamp(lo, hi)
}

pub fn quartiles(sample: &Sample) -> Quartiles {
    let sorted = sample.sorted();
    let q1 = percentile_sorted(sorted, 25.0);
    let q2 = percentile_sorted(sorted, 50.0);
    let q3 = percentile_sorted(sorted, 75.0);
    Quartiles {
        q1,
        q2,
        q3,
        iqr: q3 - q1,
    }
}

pub fn percentile_table(
    sample: &Sample,
    percentiles: &[u32],
) -> Result<BTreeMap<u32, f64>, AnalyzerError> {
    percentiles
        .iter()
        .map(|&p| percentile(sample, f64::from(p)).map(|v| (p, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_order_statistics() {
        let s = Sample::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(percentile(&s, 0.0), Ok(1.0));
        assert_eq!(percentile(&s, 100.0), Ok(4.0));
        assert_eq!(percentile(&s, 50.0), Ok(2.5));
        let p10 = percentile(&s, 10.0).unwrap();
        assert!((p10 - 1.3).abs() < 1e-12);
    }

    #[test]
    fn quartiles_of_outlier_sample() {
        let s = Sample::new(&[10.0, 12.0, 11.0, 13.0, 1000.0]).unwrap();
        let q = quartiles(&s);
        assert_eq!(q.q1, 11.0);
        assert_eq!(q.q2, 12.0);
        assert_eq!(q.q3, 13.0);
        assert_eq!(q.iqr, 2.0);
    }

    #[test]
    fn single_value_collapses_every_quantile() {
        let s = Sample::new(&[42.0]).unwrap();
        let q = quartiles(&s);
        assert_eq!((q.q1, q.q2, q.q3, q.iqr), (42.0, 42.0, 42.0, 0.0));
        let table = percentile_table(&s, &[10, 99]).unwrap();
        assert_eq!(table.get(&99), Some(&42.0));
    }

    #[test]
    fn rejects_percentile_out_of_range() {
        let s = Sample::new(&[1.0, 2.0]).unwrap();
        assert!(percentile(&s, 100.5).is_err());
        assert!(percentile(&s, -1.0).is_err());
        assert!(percentile(&s, f64::NAN).is_err());
        assert!(percentile_table(&s, &[50, 120]).is_err());
    }

    #[test]
    fn table_is_keyed_in_ascending_order() {
        let s = Sample::new(&[5.0, 1.0, 3.0]).unwrap();
        let table = percentile_table(&s, &[90, 10, 50]).unwrap();
        let keys = table.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, vec![10, 50, 90]);
        assert_eq!(table[&50], 3.0);
    }

    #[test]
    fn interpolation_spans_the_full_finite_range() {
        let s = Sample::new(&[-1.5e308, 1.5e308]).unwrap();
        assert_eq!(percentile(&s, 50.0), Ok(0.0));
        let p75 = percentile(&s, 75.0).unwrap();
        assert!((p75 / 7.5e307 - 1.0).abs() < 1e-12);
        let q = quartiles(&s);
        assert!(q.q1 < q.q2 && q.q2 < q.q3);
    }
}
