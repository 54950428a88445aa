use data_analyzer::AnalyzerError;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ServiceError {
    InvalidRequest(String),
    Analyzer(AnalyzerError),
    Json(serde_json::Error),
    Config(String),
    Logging(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Self::Analyzer(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "malformed JSON body: {err}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Analyzer(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AnalyzerError> for ServiceError {
    fn from(value: AnalyzerError) -> Self {
        Self::Analyzer(value)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::Json(_) => 400,
            Self::Analyzer(AnalyzerError::NumericOverflow(_)) => 422,
            Self::Analyzer(_) => 400,
            Self::Config(_) | Self::Logging(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Json(_) => "malformed_body",
            Self::Analyzer(AnalyzerError::InvalidInput(_)) => "invalid_input",
            Self::Analyzer(AnalyzerError::InsufficientData { .. }) => "insufficient_data",
            Self::Analyzer(AnalyzerError::InvalidConfig(_)) => "invalid_config",
            Self::Analyzer(AnalyzerError::NumericOverflow(_)) => "numeric_overflow",
            Self::Config(_) | Self::Logging(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzer_errors_map_to_client_errors() {
        let err = ServiceError::from(AnalyzerError::InvalidInput("empty".to_string()));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "invalid_input");
        assert_eq!(
            err.to_response(),
            ErrorResponse {
                error: "invalid_input".to_string(),
                message: "invalid input: empty".to_string(),
            }
        );
        assert_eq!(
            ServiceError::from(AnalyzerError::NumericOverflow("variance")).status_code(),
            422
        );
        assert_eq!(ServiceError::Config("bad".to_string()).status_code(), 500);
    }

    #[test]
    fn json_errors_keep_their_source() {
        let json_err = serde_json::from_str::<Vec<f64>>("[1, \"x\"]").unwrap_err();
        let err = ServiceError::from(json_err);
        assert_eq!(err.status_code(), 400);
        assert!(std::error::Error::source(&err).is_some());
    }
}
