use data_analyzer::{AnalysisResult, correlation_matrix};

use crate::config::ServiceConfig;
use crate::error::{ErrorResponse, ServiceError};
use crate::schema::{
    AnalysisType, CorrelationRequest, CorrelationResponse, DataAnalysisRequest,
    DataAnalysisResponse,
};

const MAX_REPORTED_OUTLIERS: usize = 10;
const DEFAULT_TITLE: &str = "Data Analysis";
const OUTLIER_RECOMMENDATIONS: [&str; 3] = [
    "Review outliers for data quality",
    "Consider transforming skewed data",
    "Validate data sources",
];

/// Framework-free handlers for the analysis endpoints. Holds only immutable
/// configuration, so one instance can serve concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct AnalysisService {
    config: ServiceConfig,
}

impl AnalysisService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_env() -> Result<Self, ServiceError> {
        Self::new(ServiceConfig::from_env()?)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        request: &DataAnalysisRequest,
    ) -> Result<DataAnalysisResponse, ServiceError> {
        request.validate(self.config.max_data_points)?;
        log::info!(
            "starting {} analysis - {} data points",
            request.analysis_type.label().to_lowercase(),
            request.data.len()
        );
        let cfg = request.analyzer_config(&self.config.analyzer);
        let statistics = data_analyzer::compute(&request.data, &cfg)?;

        let flagged = statistics.outliers.flagged_indices();
        let outliers = flagged
            .iter()
            .take(MAX_REPORTED_OUTLIERS)
            .map(|&i| request.data[i])
            .collect();
        let outlier_labels = request.labels.as_ref().map(|labels| {
            flagged
                .iter()
                .take(MAX_REPORTED_OUTLIERS)
                .map(|&i| labels[i].clone())
                .collect()
        });
        let recommendations = if flagged.is_empty() {
            Vec::new()
        } else {
            OUTLIER_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
        };

        Ok(DataAnalysisResponse {
            title: request
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            analysis_type: request.analysis_type,
            summary: summarize(request.analysis_type, &statistics),
            insights: statistics.insights.clone(),
            statistics,
            outliers,
            outlier_labels,
            recommendations,
        })
    }

    pub fn correlate(
        &self,
        request: &CorrelationRequest,
    ) -> Result<CorrelationResponse, ServiceError> {
        if let Some((name, values)) = request
            .datasets
            .iter()
            .find(|(_, values)| values.len() > self.config.max_data_points)
        {
            return Err(ServiceError::InvalidRequest(format!(
                "dataset '{name}' exceeds maximum {} data points ({})",
                self.config.max_data_points,
                values.len()
            )));
        }
        log::info!("correlating {} datasets", request.datasets.len());
        Ok(CorrelationResponse {
            pairs: correlation_matrix(&request.datasets)?,
        })
    }

    pub fn handle_analyze_json(&self, body: &str) -> Result<String, ServiceError> {
        let handled = serde_json::from_str::<DataAnalysisRequest>(body)
            .map_err(ServiceError::from)
            .and_then(|request| self.analyze(&request))
            .and_then(|response| serde_json::to_string(&response).map_err(ServiceError::from));
        handled.inspect_err(|err| log::warn!("analysis request rejected: {err}"))
    }

    pub fn handle_correlation_json(&self, body: &str) -> Result<String, ServiceError> {
        let handled = serde_json::from_str::<CorrelationRequest>(body)
            .map_err(ServiceError::from)
            .and_then(|request| self.correlate(&request))
            .and_then(|response| serde_json::to_string(&response).map_err(ServiceError::from));
        handled.inspect_err(|err| log::warn!("correlation request rejected: {err}"))
    }

    /// Turns a handler result into an HTTP-style status and JSON body.
    pub fn respond(result: Result<String, ServiceError>) -> (u16, String) {
        match result {
            Ok(body) => (200, body),
            Err(err) => {
                let body = error_body(&err.to_response());
                (err.status_code(), body)
            }
        }
    }
}

fn error_body(response: &ErrorResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| {
        r#"{"error":"internal_error","message":"failed to encode error"}"#.to_string()
    })
}

fn summarize(kind: AnalysisType, result: &AnalysisResult) -> String {
    let noun = if result.count == 1 { "point" } else { "points" };
    let mut summary = format!(
        "{} analysis completed for {} data {noun}",
        kind.label(),
        result.count
    );
    if let Some(trend) = &result.trend {
        if matches!(kind, AnalysisType::Comprehensive | AnalysisType::Regression) {
            summary.push_str(&format!(
                "; {} trend (R² {:.2})",
                trend.direction.describe(),
                trend.r_squared
            ));
        }
    }
    summary
}
