use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_IQR_MULTIPLIER, OutlierMethod};
use crate::descriptive::{CentralMoments, central_moments, mean};
use crate::quantiles::{Quartiles, quartiles};
use crate::sample::Sample;

/// Per-position outlier flags for one detection method. `flags` always has
/// the sample's length; `indices` and `values` list the flagged positions in
/// ascending index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSet {
    pub flags: Vec<bool>,
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl OutlierSet {
    fn none(len: usize) -> Self {
        Self {
            flags: vec![false; len],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    fn from_predicate(values: &[f64], is_outlier: impl Fn(f64) -> bool) -> Self {
        let flags = values.iter().map(|v| is_outlier(*v)).collect::<Vec<_>>();
        let indices = flags
            .iter()
            .enumerate()
            .filter_map(|(i, flagged)| flagged.then_some(i))
            .collect::<Vec<_>>();
        let values = indices.iter().map(|&i| values[i]).collect();
        Self {
            flags,
            indices,
            values,
        }
    }

    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrFence {
    pub lower: f64,
    pub upper: f64,
}

impl IqrFence {
    pub fn new(quartiles: &Quartiles, multiplier: f64) -> Self {
        Self {
            lower: quartiles.q1 - multiplier * quartiles.iqr,
            upper: quartiles.q3 + multiplier * quartiles.iqr,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Results of the selected detection methods; an unselected method is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub method: OutlierMethod,
    pub iqr: Option<OutlierSet>,
    pub zscore: Option<OutlierSet>,
}

impl OutlierReport {
    pub fn detect(
        sample: &Sample,
        method: OutlierMethod,
        iqr_multiplier: f64,
        z_threshold: f64,
    ) -> Self {
        let moments = central_moments(sample, mean(sample));
        Self::detect_with(sample, &moments, method, iqr_multiplier, z_threshold)
    }

    pub(crate) fn detect_with(
        sample: &Sample,
        moments: &CentralMoments,
        method: OutlierMethod,
        iqr_multiplier: f64,
        z_threshold: f64,
    ) -> Self {
        Self {
            method,
            iqr: method
                .uses_iqr()
                .then(|| detect_outliers_iqr_with(sample, iqr_multiplier)),
            zscore: method
                .uses_zscore()
                .then(|| zscore_outliers(sample, moments, z_threshold)),
        }
    }

    /// Union of the flagged indices across the selected methods, ascending.
    pub fn flagged_indices(&self) -> Vec<usize> {
        let mut out = self
            .iqr
            .iter()
            .chain(self.zscore.iter())
            .flat_map(|set| set.indices.iter().copied())
            .collect::<Vec<_>>();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn has_outliers(&self) -> bool {
        self.iqr.iter().chain(self.zscore.iter()).any(|set| !set.is_empty())
    }
}

pub fn detect_outliers_iqr(sample: &Sample) -> OutlierSet {
    detect_outliers_iqr_with(sample, DEFAULT_IQR_MULTIPLIER)
}

/// Flags values outside `[Q1 - k*IQR, Q3 + k*IQR]`. A zero-width IQR flags
/// nothing.
pub fn detect_outliers_iqr_with(sample: &Sample, multiplier: f64) -> OutlierSet {
    let q = quartiles(sample);
    if q.iqr == 0.0 {
        log::debug!("iqr is zero, skipping iqr outlier fence");
        return OutlierSet::none(sample.len());
    }
    let fence = IqrFence::new(&q, multiplier);
    OutlierSet::from_predicate(sample.values(), |v| !fence.contains(v))
}

/// Flags values with `|z| > threshold` using the population standard
/// deviation. Nothing is flagged when the deviation is zero or undefined.
pub fn detect_outliers_zscore(sample: &Sample, threshold: f64) -> OutlierSet {
    zscore_outliers(sample, &central_moments(sample, mean(sample)), threshold)
}

fn zscore_outliers(sample: &Sample, moments: &CentralMoments, threshold: f64) -> OutlierSet {
    if sample.require(2).is_err() || moments.m2 == 0.0 {
        return OutlierSet::none(sample.len());
    }
    OutlierSet::from_predicate(sample.values(), |v| {
        moments.z_score(v).is_some_and(|z| z.abs() > threshold)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iqr_flags_the_extreme_point() {
        let s = Sample::new(&[10.0, 12.0, 11.0, 13.0, 1000.0]).unwrap();
        let set = detect_outliers_iqr(&s);
        assert_eq!(set.indices, vec![4]);
        assert_eq!(set.values, vec![1000.0]);
        assert_eq!(set.flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn zero_iqr_flags_nothing() {
        let s = Sample::new(&[5.0, 5.0, 5.0, 5.0, 5.0, 100.0]).unwrap();
        let set = detect_outliers_iqr(&s);
        assert!(set.is_empty());
        assert_eq!(set.flags.len(), 6);
    }

    #[test]
    fn zscore_is_bounded_by_sample_size() {
        // with five points no population z-score can exceed sqrt(4) = 2
        let s = Sample::new(&[10.0, 12.0, 11.0, 13.0, 1000.0]).unwrap();
        assert!(detect_outliers_zscore(&s, 3.0).is_empty());
        assert_eq!(detect_outliers_zscore(&s, 1.5).indices, vec![4]);
    }

    #[test]
    fn zscore_needs_spread() {
        let flat = Sample::new(&[1.0, 1.0, 1.0]).unwrap();
        assert!(detect_outliers_zscore(&flat, 3.0).is_empty());
        let one = Sample::new(&[1.0]).unwrap();
        let set = detect_outliers_zscore(&one, 3.0);
        assert_eq!(set.flags, vec![false]);
    }

    #[test]
    fn report_respects_selector() {
        let s = Sample::new(&[10.0, 12.0, 11.0, 13.0, 1000.0]).unwrap();
        let iqr_only = OutlierReport::detect(&s, OutlierMethod::Iqr, 1.5, 3.0);
        assert!(iqr_only.zscore.is_none());
        assert!(iqr_only.has_outliers());

        let both = OutlierReport::detect(&s, OutlierMethod::Both, 1.5, 1.5);
        assert_eq!(both.flagged_indices(), vec![4]);
    }

    #[test]
    fn zscore_survives_extreme_magnitudes() {
        let mut values = vec![1.0e-200; 12];
        values[3] = 2.0e-200;
        values.push(5.0e-198);
        let s = Sample::new(&values).unwrap();
        assert_eq!(detect_outliers_zscore(&s, 3.0).indices, vec![12]);

        let wide = Sample::new(&[-1.5e308, 1.5e308, 0.0, 0.0, 0.0]).unwrap();
        let set = detect_outliers_zscore(&wide, 1.5);
        assert_eq!(set.indices, vec![0, 1]);
    }
}
