#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    InvalidInput(String),
    InsufficientData { required: usize, actual: usize },
    InvalidConfig(String),
    NumericOverflow(&'static str),
}

impl std::fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InsufficientData { required, actual } => write!(
                f,
                "insufficient data: at least {required} data points required, got {actual}"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::NumericOverflow(field) => write!(f, "numeric overflow while computing {field}"),
        }
    }
}

impl std::error::Error for AnalyzerError {}
