use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::quantiles::percentile_sorted;
use crate::sample::Sample;

// Mean magnitude relative to the deviation below which CV is undefined.
const CV_MEAN_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralTendency {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub mode_frequency: usize,
    /// Every value sharing the highest frequency, in first-occurrence order.
    pub modes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispersion {
    pub std_dev: Option<f64>,
    pub variance: Option<f64>,
    pub sample_variance: Option<f64>,
    /// Coefficient of variation in percent.
    pub cv: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModeSummary {
    pub value: f64,
    pub frequency: usize,
    pub modes: Vec<f64>,
}

/// Central moments of `(x - mean) / scale`, divided by n. `scale` is a power
/// of two near the largest magnitude, so fourth powers stay in range for
/// any finite sample and rescaling back is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CentralMoments {
    pub n: usize,
    pub mean: f64,
    pub scale: f64,
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
}

impl CentralMoments {
    pub fn variance(&self) -> f64 {
        self.rescale_squared(self.m2)
    }

    pub fn sample_variance(&self) -> f64 {
        let n = self.n as f64;
        self.rescale_squared(self.m2 * n / (n - 1.0))
    }

    pub fn std_dev(&self) -> f64 {
        self.m2.sqrt() * self.scale
    }

    pub fn skewness(&self) -> f64 {
        if self.m2 == 0.0 {
            return 0.0;
        }
        self.m3 / self.m2.powf(1.5)
    }

    pub fn excess_kurtosis(&self) -> f64 {
        if self.m2 == 0.0 {
            return 0.0;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }

    /// Standard score of `value`; `None` when the sample has no spread.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.m2 == 0.0 {
            return None;
        }
        Some((value / self.scale - self.mean / self.scale) / self.m2.sqrt())
    }

    // A positive spread below the subnormal range still reads as positive.
    fn rescale_squared(&self, scaled: f64) -> f64 {
        let value = scaled * self.scale * self.scale;
        if value == 0.0 && scaled > 0.0 {
            f64::from_bits(1)
        } else {
            value
        }
    }
}

/// Power of two closest below the largest magnitude in `values`, or 1 when
/// every value is zero.
pub(crate) fn magnitude_scale(values: &[f64]) -> f64 {
    let max_abs = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 || !max_abs.is_finite() {
        return 1.0;
    }
    let exp = (max_abs.log2().floor() as i32).clamp(-1022, 1023);
    f64::from_bits(((exp + 1023) as u64) << 52)
}

pub fn mean(sample: &Sample) -> f64 {
    if sample.is_constant() {
        return sample.min();
    }
    let scale = magnitude_scale(sample.values());
    let total = sample.values().iter().map(|v| v / scale).sum::<f64>();
    total / sample.len() as f64 * scale
}

pub fn median(sample: &Sample) -> f64 {
    percentile_sorted(sample.sorted(), 50.0)
}

/// Most frequent value; ties go to the value seen first in the original order.
pub fn mode(sample: &Sample) -> ModeSummary {
    let mut slots = BTreeMap::<u64, usize>::new();
    let mut counts = Vec::<(f64, usize)>::new();
    for &v in sample.values() {
        let key = if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        match slots.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(key, counts.len());
                counts.push((v, 1));
            }
        }
    }
    let frequency = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let modes = counts
        .iter()
        .filter(|(_, n)| *n == frequency)
        .map(|(v, _)| *v)
        .collect::<Vec<_>>();
    ModeSummary {
        value: modes.first().copied().unwrap_or_else(|| sample.values()[0]),
        frequency,
        modes,
    }
}

pub fn population_variance(sample: &Sample) -> Result<f64, AnalyzerError> {
    sample.require(2)?;
    Ok(central_moments(sample, mean(sample)).variance())
}

pub fn sample_variance(sample: &Sample) -> Result<f64, AnalyzerError> {
    sample.require(2)?;
    Ok(central_moments(sample, mean(sample)).sample_variance())
}

pub fn std_dev(sample: &Sample) -> Result<f64, AnalyzerError> {
    sample.require(2)?;
    Ok(central_moments(sample, mean(sample)).std_dev())
}

pub fn coefficient_of_variation(std_dev: f64, mean: f64) -> Option<f64> {
    if mean == 0.0 || mean.abs() < CV_MEAN_EPS * std_dev {
        None
    } else {
        Some(std_dev / mean * 100.0)
    }
}

pub fn central_tendency(sample: &Sample) -> CentralTendency {
    let mode = mode(sample);
    CentralTendency {
        mean: mean(sample),
        median: median(sample),
        mode: mode.value,
        mode_frequency: mode.frequency,
        modes: mode.modes,
    }
}

pub fn dispersion(sample: &Sample, mean: f64) -> Dispersion {
    dispersion_from(sample, &central_moments(sample, mean))
}

pub(crate) fn dispersion_from(sample: &Sample, moments: &CentralMoments) -> Dispersion {
    let spread = sample.require(2).is_ok();
    let std_dev = spread.then(|| moments.std_dev());
    Dispersion {
        std_dev,
        variance: spread.then(|| moments.variance()),
        sample_variance: spread.then(|| moments.sample_variance()),
        cv: std_dev.and_then(|sd| coefficient_of_variation(sd, moments.mean)),
        min: sample.min(),
        max: sample.max(),
        range: sample.max() - sample.min(),
    }
}

/// Population central moments around `mean`. A constant sample has all
/// moments at exactly zero.
pub(crate) fn central_moments(sample: &Sample, mean: f64) -> CentralMoments {
    let n = sample.len();
    let scale = magnitude_scale(sample.values());
    let mut moments = CentralMoments {
        n,
        mean,
        scale,
        m2: 0.0,
        m3: 0.0,
        m4: 0.0,
    };
    if sample.is_constant() {
        return moments;
    }
    let center = mean / scale;
    for &x in sample.values() {
        let d = x / scale - center;
        let d2 = d * d;
        moments.m2 += d2;
        moments.m3 += d2 * d;
        moments.m4 += d2 * d2;
    }
    moments.m2 /= n as f64;
    moments.m3 /= n as f64;
    moments.m4 /= n as f64;
    moments
}
