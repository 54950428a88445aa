use std::collections::BTreeMap;

use data_analyzer::{AnalysisResult, AnalyzerConfig, CorrelationPair, OutlierMethod};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    #[default]
    Comprehensive,
    Statistical,
    Correlation,
    Regression,
}

impl AnalysisType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Comprehensive => "Comprehensive",
            Self::Statistical => "Statistical",
            Self::Correlation => "Correlation",
            Self::Regression => "Regression",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataAnalysisRequest {
    pub data: Vec<f64>,
    #[serde(default)]
    pub analysis_type: AnalysisType,
    pub labels: Option<Vec<String>>,
    pub title: Option<String>,
    pub z_threshold: Option<f64>,
    pub percentiles: Option<Vec<u32>>,
    pub outlier_method: Option<OutlierMethod>,
}

impl DataAnalysisRequest {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data,
            analysis_type: AnalysisType::default(),
            labels: None,
            title: None,
            z_threshold: None,
            percentiles: None,
            outlier_method: None,
        }
    }

    /// Request-level limits. Sample content (emptiness, finiteness) is left
    /// to the analyzer.
    pub fn validate(&self, max_data_points: usize) -> Result<(), ServiceError> {
        if self.data.len() > max_data_points {
            return Err(ServiceError::InvalidRequest(format!(
                "maximum {max_data_points} data points, got {}",
                self.data.len()
            )));
        }
        if let Some(labels) = &self.labels {
            if labels.len() != self.data.len() {
                return Err(ServiceError::InvalidRequest(format!(
                    "{} labels supplied for {} data points",
                    labels.len(),
                    self.data.len()
                )));
            }
        }
        Ok(())
    }

    /// Service defaults with this request's overrides applied.
    pub fn analyzer_config(&self, base: &AnalyzerConfig) -> AnalyzerConfig {
        let mut cfg = base.clone();
        if let Some(threshold) = self.z_threshold {
            cfg.z_threshold = threshold;
        }
        if let Some(percentiles) = &self.percentiles {
            cfg.percentiles = percentiles.clone();
        }
        if let Some(method) = self.outlier_method {
            cfg.outlier_method = method;
        }
        cfg
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataAnalysisResponse {
    pub title: String,
    pub analysis_type: AnalysisType,
    pub summary: String,
    pub statistics: AnalysisResult,
    pub insights: Vec<String>,
    pub outliers: Vec<f64>,
    pub outlier_labels: Option<Vec<String>>,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRequest {
    pub datasets: BTreeMap<String, Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResponse {
    pub pairs: Vec<CorrelationPair>,
}
