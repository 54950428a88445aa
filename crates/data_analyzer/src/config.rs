use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;

pub const DEFAULT_PERCENTILES: [u32; 7] = [10, 25, 50, 75, 90, 95, 99];
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    Iqr,
    #[serde(rename = "zscore")]
    ZScore,
    #[default]
    Both,
}

impl OutlierMethod {
    pub fn uses_iqr(self) -> bool {
        matches!(self, Self::Iqr | Self::Both)
    }

    pub fn uses_zscore(self) -> bool {
        matches!(self, Self::ZScore | Self::Both)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub z_threshold: f64,
    pub iqr_multiplier: f64,
    pub percentiles: Vec<u32>,
    pub outlier_method: OutlierMethod,
    /// Slope magnitude, as a fraction of |mean| per index step, below which a
    /// series is classified as stable.
    pub relative_trend_threshold: f64,
    /// Fallback threshold, as a fraction of the largest |value|, used when
    /// |mean| is negligible next to the data.
    pub absolute_trend_epsilon: f64,
    pub moving_average_window: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            z_threshold: DEFAULT_Z_THRESHOLD,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            outlier_method: OutlierMethod::Both,
            relative_trend_threshold: 0.01,
            absolute_trend_epsilon: 1e-9,
            moving_average_window: 5,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold;
        self
    }

    pub fn with_percentiles(mut self, percentiles: Vec<u32>) -> Self {
        self.percentiles = percentiles;
        self
    }

    pub fn with_outlier_method(mut self, method: OutlierMethod) -> Self {
        self.outlier_method = method;
        self
    }

    pub fn with_trend_thresholds(mut self, relative: f64, absolute: f64) -> Self {
        self.relative_trend_threshold = relative;
        self.absolute_trend_epsilon = absolute;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(AnalyzerError::InvalidConfig(format!(
                "z_threshold must be a positive finite number, got {}",
                self.z_threshold
            )));
        }
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(AnalyzerError::InvalidConfig(format!(
                "iqr_multiplier must be a non-negative finite number, got {}",
                self.iqr_multiplier
            )));
        }
        if let Some(p) = self.percentiles.iter().find(|p| **p > 100) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "percentile {p} is outside 0..=100"
            )));
        }
        if !self.relative_trend_threshold.is_finite() || self.relative_trend_threshold < 0.0 {
            return Err(AnalyzerError::InvalidConfig(
                "relative_trend_threshold must be a non-negative finite number".to_string(),
            ));
        }
        if !self.absolute_trend_epsilon.is_finite() || self.absolute_trend_epsilon < 0.0 {
            return Err(AnalyzerError::InvalidConfig(
                "absolute_trend_epsilon must be a non-negative finite number".to_string(),
            ));
        }
        Ok(())
    }
}
