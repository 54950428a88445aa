use crate::error::AnalyzerError;

/// Validated numeric sample: non-empty, every value finite.
///
/// Holds its own copy of the caller's values plus a sorted view used by the
/// order-statistic routines, so callers' data is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    sorted: Vec<f64>,
}

impl Sample {
    pub fn new(values: &[f64]) -> Result<Self, AnalyzerError> {
        Self::from_vec(values.to_vec())
    }

    pub fn from_vec(values: Vec<f64>) -> Result<Self, AnalyzerError> {
        if values.is_empty() {
            return Err(AnalyzerError::InvalidInput(
                "sample must contain at least one value".to_string(),
            ));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnalyzerError::InvalidInput(format!(
                "value at index {idx} is not finite"
            )));
        }
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Ok(Self { values, sorted })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    // never empty once constructed
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    /// True when every value is identical (compares the sorted extremes, so
    /// `-0.0` and `0.0` count as the same value).
    pub fn is_constant(&self) -> bool {
        self.min() == self.max()
    }

    pub fn require(&self, required: usize) -> Result<(), AnalyzerError> {
        if self.len() < required {
            return Err(AnalyzerError::InsufficientData {
                required,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for Sample {
    type Error = AnalyzerError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_vec(values)
    }
}
