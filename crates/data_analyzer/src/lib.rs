//! Descriptive statistics, outlier detection and linear trend analysis over
//! a numeric sample, plus template-driven insight sentences.
//!
//! Every call is independent: [`compute`] takes the caller's values and a
//! configuration and returns a fresh [`AnalysisResult`] or an
//! [`AnalyzerError`], never a partial result.

mod config;
mod correlation;
mod descriptive;
mod error;
mod insights;
mod outliers;
mod quantiles;
mod sample;
mod shape;
mod trend;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use config::{
    AnalyzerConfig, DEFAULT_IQR_MULTIPLIER, DEFAULT_PERCENTILES, DEFAULT_Z_THRESHOLD,
    OutlierMethod,
};
pub use correlation::{CorrelationPair, correlation_matrix, interpret_correlation, pearson};
pub use descriptive::{
    CentralTendency, Dispersion, ModeSummary, central_tendency, coefficient_of_variation,
    dispersion, mean, median, mode, population_variance, sample_variance, std_dev,
};
pub use error::AnalyzerError;
pub use insights::generate_insights;
pub use outliers::{
    IqrFence, OutlierReport, OutlierSet, detect_outliers_iqr, detect_outliers_iqr_with,
    detect_outliers_zscore,
};
pub use quantiles::{Quartiles, percentile, percentile_table, quartiles};
pub use sample::Sample;
pub use shape::{ShapeSummary, interpret_kurtosis, interpret_skewness, kurtosis, shape, skewness};
pub use trend::{
    Regression, Trend, TrendDirection, TrendPolicy, TrendStrength, compute_trend,
    compute_trend_with, linear_regression, moving_average,
};

use descriptive::{central_moments, dispersion_from};
use shape::shape_from;
use trend::trend_around;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub count: usize,
    pub central_tendency: CentralTendency,
    pub dispersion: Dispersion,
    pub shape: ShapeSummary,
    pub quartiles: Quartiles,
    pub percentiles: BTreeMap<u32, f64>,
    pub outliers: OutlierReport,
    pub trend: Option<Trend>,
    pub moving_average: Vec<f64>,
    pub insights: Vec<String>,
}

impl AnalysisResult {
    fn first_non_finite(&self) -> Option<&'static str> {
        let ct = &self.central_tendency;
        let d = &self.dispersion;
        let q = &self.quartiles;
        let scalars = [
            ("mean", Some(ct.mean)),
            ("median", Some(ct.median)),
            ("std_dev", d.std_dev),
            ("variance", d.variance),
            ("sample_variance", d.sample_variance),
            ("cv", d.cv),
            ("range", Some(d.range)),
            ("skewness", self.shape.skewness),
            ("kurtosis", self.shape.kurtosis),
            ("iqr", Some(q.iqr)),
        ];
        if let Some((name, _)) = scalars
            .iter()
            .find(|(_, v)| v.is_some_and(|v| !v.is_finite()))
        {
            return Some(*name);
        }
        if self.percentiles.values().any(|v| !v.is_finite()) {
            return Some("percentiles");
        }
        if self.moving_average.iter().any(|v| !v.is_finite()) {
            return Some("moving_average");
        }
        if let Some(t) = &self.trend {
            let fit = [t.slope, t.intercept, t.r_squared, t.standard_error, t.acceleration];
            if fit.iter().any(|v| !v.is_finite()) {
                return Some("trend");
            }
        }
        None
    }
}

/// Holds a validated configuration and analyzes samples with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticalAnalyzer {
    config: AnalyzerConfig,
}

impl StatisticalAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, values: &[f64]) -> Result<AnalysisResult, AnalyzerError> {
        compute(values, &self.config)
    }
}

pub fn compute(values: &[f64], config: &AnalyzerConfig) -> Result<AnalysisResult, AnalyzerError> {
    config.validate()?;
    let sample = Sample::new(values)?;
    log::debug!("analyzing {} data points", sample.len());

    let central = central_tendency(&sample);
    let moments = central_moments(&sample, central.mean);
    let dispersion = dispersion_from(&sample, &moments);
    if dispersion.variance == Some(0.0) {
        log::debug!("sample has zero variance");
    }
    let trend = match trend_around(&sample, central.mean, &TrendPolicy::from(config)) {
        Ok(trend) => Some(trend),
        Err(AnalyzerError::InsufficientData { .. }) => None,
        Err(err) => return Err(err),
    };

    let mut result = AnalysisResult {
        count: sample.len(),
        central_tendency: central,
        dispersion,
        shape: shape_from(&sample, &moments),
        quartiles: quartiles(&sample),
        percentiles: percentile_table(&sample, &config.percentiles)?,
        outliers: OutlierReport::detect_with(
            &sample,
            &moments,
            config.outlier_method,
            config.iqr_multiplier,
            config.z_threshold,
        ),
        trend,
        moving_average: moving_average(sample.values(), config.moving_average_window),
        insights: Vec::new(),
    };
    if let Some(field) = result.first_non_finite() {
        return Err(AnalyzerError::NumericOverflow(field));
    }
    result.insights = generate_insights(&result);
    Ok(result)
}
