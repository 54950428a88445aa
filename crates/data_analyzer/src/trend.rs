use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::descriptive::{magnitude_scale, mean};
use crate::error::AnalyzerError;
use crate::sample::Sample;

const STRONG_FIT: f64 = 0.7;
const MODERATE_FIT: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Up => "upward",
            Self::Down => "downward",
            Self::Stable => "stable",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

impl TrendStrength {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > STRONG_FIT {
            Self::Strong
        } else if r_squared > MODERATE_FIT {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub standard_error: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub standard_error: f64,
    /// Slope of the second half minus slope of the first half.
    pub acceleration: f64,
}

/// Thresholds deciding when a slope counts as movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendPolicy {
    pub relative_threshold: f64,
    pub absolute_epsilon: f64,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

impl From<&AnalyzerConfig> for TrendPolicy {
    fn from(cfg: &AnalyzerConfig) -> Self {
        Self {
            relative_threshold: cfg.relative_trend_threshold,
            absolute_epsilon: cfg.absolute_trend_epsilon,
        }
    }
}

impl TrendPolicy {
    /// Stability threshold for a series with the given mean and largest
    /// absolute value.
    pub fn threshold(&self, mean: f64, magnitude: f64) -> f64 {
        let floor = self.absolute_epsilon * magnitude;
        if mean.abs() < floor {
            floor
        } else {
            self.relative_threshold * mean.abs()
        }
    }

    pub fn classify(&self, slope: f64, mean: f64, magnitude: f64) -> TrendDirection {
        let threshold = self.threshold(mean, magnitude);
        if slope == 0.0 || slope.abs() < threshold {
            TrendDirection::Stable
        } else if slope > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        }
    }
}

/// Ordinary least squares fit of `y` against `x`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<Regression, AnalyzerError> {
    if x.len() != y.len() {
        return Err(AnalyzerError::InvalidInput(format!(
            "regression inputs differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(AnalyzerError::InsufficientData {
            required: 2,
            actual: x.len(),
        });
    }
    if y.iter().all(|v| *v == y[0]) {
        return Ok(Regression {
            slope: 0.0,
            intercept: y[0],
            r_squared: 0.0,
            standard_error: 0.0,
        });
    }

    // fit in units of a power-of-two scale per axis, rescale at the end
    let (sx, sy) = (magnitude_scale(x), magnitude_scale(y));
    let u = x.iter().map(|v| v / sx).collect::<Vec<_>>();
    let w = y.iter().map(|v| v / sy).collect::<Vec<_>>();

    let n = x.len() as f64;
    let mean_u = u.iter().sum::<f64>() / n;
    let mean_w = w.iter().sum::<f64>() / n;
    let mut suw = 0.0;
    let mut suu = 0.0;
    for (ui, wi) in u.iter().zip(&w) {
        suw += (ui - mean_u) * (wi - mean_w);
        suu += (ui - mean_u).powi(2);
    }
    let scaled_slope = if suu == 0.0 { 0.0 } else { suw / suu };
    let scaled_intercept = mean_w - scaled_slope * mean_u;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (ui, wi) in u.iter().zip(&w) {
        ss_res += (wi - (scaled_slope * ui + scaled_intercept)).powi(2);
        ss_tot += (wi - mean_w).powi(2);
    }
    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };
    let standard_error = if x.len() > 2 {
        (ss_res / (n - 2.0)).sqrt() * sy
    } else {
        0.0
    };
    let slope = scaled_slope * sy / sx;
    let intercept = scaled_intercept * sy;

    Ok(Regression {
        slope,
        intercept,
        r_squared,
        standard_error,
    })
}

fn index_regression(values: &[f64]) -> Result<Regression, AnalyzerError> {
    let x = (0..values.len()).map(|i| i as f64).collect::<Vec<_>>();
    linear_regression(&x, values)
}

pub fn compute_trend(sample: &Sample) -> Result<Trend, AnalyzerError> {
    compute_trend_with(sample, &TrendPolicy::default())
}

/// Regresses value on 0-based index and classifies the slope.
pub fn compute_trend_with(sample: &Sample, policy: &TrendPolicy) -> Result<Trend, AnalyzerError> {
    trend_around(sample, mean(sample), policy)
}

pub(crate) fn trend_around(
    sample: &Sample,
    mean: f64,
    policy: &TrendPolicy,
) -> Result<Trend, AnalyzerError> {
    sample.require(2)?;
    let values = sample.values();
    let fit = index_regression(values)?;
    let magnitude = sample.min().abs().max(sample.max().abs());

    let acceleration = if values.len() >= 4 {
        let (first, second) = values.split_at(values.len() / 2);
        index_regression(second)?.slope - index_regression(first)?.slope
    } else {
        0.0
    };

    Ok(Trend {
        direction: policy.classify(fit.slope, mean, magnitude),
        strength: TrendStrength::from_r_squared(fit.r_squared),
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        standard_error: fit.standard_error,
        acceleration,
    })
}

/// Simple moving average; empty when the window is zero or longer than the
/// series.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    let scale = magnitude_scale(values);
    values
        .windows(window)
        .map(|w| w.iter().map(|v| v / scale).sum::<f64>() / window as f64 * scale)
        .collect()
}
