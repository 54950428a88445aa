use serde::{Deserialize, Serialize};

use crate::descriptive::{CentralMoments, central_moments, mean};
use crate::error::AnalyzerError;
use crate::sample::Sample;

const SHAPE_NEUTRAL_BAND: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSummary {
    pub skewness: Option<f64>,
    pub skew_interpretation: Option<String>,
    pub kurtosis: Option<f64>,
    pub kurtosis_interpretation: Option<String>,
}

/// Fisher-Pearson coefficient of skewness, `m3 / m2^1.5`.
pub fn skewness(sample: &Sample) -> Result<f64, AnalyzerError> {
    sample.require(2)?;
    Ok(central_moments(sample, mean(sample)).skewness())
}

/// Excess kurtosis, `m4 / m2^2 - 3`; zero for a normal distribution.
pub fn kurtosis(sample: &Sample) -> Result<f64, AnalyzerError> {
    sample.require(2)?;
    Ok(central_moments(sample, mean(sample)).excess_kurtosis())
}

pub fn interpret_skewness(skewness: f64) -> String {
    let magnitude = skewness.abs();
    if magnitude < SHAPE_NEUTRAL_BAND {
        "symmetric".to_string()
    } else if skewness > 0.0 {
        format!("right-skewed (positive, {magnitude:.2})")
    } else {
        format!("left-skewed (negative, {magnitude:.2})")
    }
}

pub fn interpret_kurtosis(kurtosis: f64) -> String {
    if kurtosis.abs() < SHAPE_NEUTRAL_BAND {
        "mesokurtic (normal tails)".to_string()
    } else if kurtosis > 0.0 {
        format!("leptokurtic (heavy tails, {kurtosis:.2})")
    } else {
        format!("platykurtic (light tails, {kurtosis:.2})")
    }
}

pub fn shape(sample: &Sample) -> ShapeSummary {
    shape_from(sample, &central_moments(sample, mean(sample)))
}

pub(crate) fn shape_from(sample: &Sample, moments: &CentralMoments) -> ShapeSummary {
    let spread = sample.require(2).is_ok();
    let skewness = spread.then(|| moments.skewness());
    let kurtosis = spread.then(|| moments.excess_kurtosis());
    ShapeSummary {
        skewness,
        skew_interpretation: skewness.map(interpret_skewness),
        kurtosis,
        kurtosis_interpretation: kurtosis.map(interpret_kurtosis),
    }
}
