use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptive::magnitude_scale;
use crate::error::AnalyzerError;
use crate::sample::Sample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub left: String,
    pub right: String,
    pub correlation: f64,
    pub interpretation: String,
}

/// Pearson correlation coefficient. Series without spread correlate at 0.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64, AnalyzerError> {
    if a.len() != b.len() {
        return Err(AnalyzerError::InvalidInput(format!(
            "correlated series differ in length ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    if a.len() < 2 {
        return Err(AnalyzerError::InsufficientData {
            required: 2,
            actual: a.len(),
        });
    }
    if a.iter().all(|v| *v == a[0]) || b.iter().all(|v| *v == b[0]) {
        return Ok(0.0);
    }
    // r is unit-free, so each series is reduced to its power-of-two scale
    let (sa, sb) = (magnitude_scale(a), magnitude_scale(b));
    let n = a.len() as f64;
    let mean_a = a.iter().map(|v| v / sa).sum::<f64>() / n;
    let mean_b = b.iter().map(|v| v / sb).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (ai, bi) in a.iter().zip(b.iter()) {
        let da = *ai / sa - mean_a;
        let db = *bi / sb - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = var_a.sqrt() * var_b.sqrt();
    if denom == 0.0 {
        Ok(0.0)
    } else {
        Ok((cov / denom).clamp(-1.0, 1.0))
    }
}

pub fn interpret_correlation(r: f64) -> String {
    let magnitude = r.abs();
    let strength = if magnitude > 0.9 {
        "very strong"
    } else if magnitude > 0.7 {
        "strong"
    } else if magnitude > 0.5 {
        "moderate"
    } else if magnitude > 0.3 {
        "weak"
    } else {
        "very weak"
    };
    let direction = if r > 0.0 { "positive" } else { "negative" };
    format!("{strength} {direction} correlation")
}

/// Correlates every unordered pair of named series, in name order.
pub fn correlation_matrix(
    datasets: &BTreeMap<String, Vec<f64>>,
) -> Result<Vec<CorrelationPair>, AnalyzerError> {
    if datasets.len() < 2 {
        return Err(AnalyzerError::InvalidInput(
            "at least 2 datasets required".to_string(),
        ));
    }
    let validated = datasets
        .iter()
        .map(|(name, values)| {
            Sample::new(values)
                .map(|s| (name.as_str(), s))
                .map_err(|err| AnalyzerError::InvalidInput(format!("dataset '{name}': {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut pairs = Vec::new();
    for (i, (left, a)) in validated.iter().enumerate() {
        for (right, b) in &validated[i + 1..] {
            let r = pearson(a.values(), b.values())?;
            pairs.push(CorrelationPair {
                left: (*left).to_string(),
                right: (*right).to_string(),
                correlation: r,
                interpretation: interpret_correlation(r),
            });
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_aligned_series() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), Ok(0.0));
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 4.0]), Ok(0.0));
    }

    #[test]
    fn mismatched_or_short_series_fail() {
        assert!(matches!(
            pearson(&[1.0], &[1.0, 2.0]),
            Err(AnalyzerError::InvalidInput(_))
        ));
        assert!(matches!(
            pearson(&[1.0], &[1.0]),
            Err(AnalyzerError::InsufficientData { .. })
        ));
    }

    #[test]
    fn matrix_covers_each_pair_once() {
        let mut data = BTreeMap::new();
        data.insert("sales".to_string(), vec![1.0, 2.0, 3.0, 4.0]);
        data.insert("cost".to_string(), vec![2.0, 4.0, 6.0, 8.0]);
        data.insert("returns".to_string(), vec![4.0, 3.0, 2.0, 1.0]);
        let pairs = correlation_matrix(&data).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].left, "cost");
        assert_eq!(pairs[0].right, "returns");
        assert_eq!(pairs[0].interpretation, "very strong negative correlation");
        assert_eq!(pairs[1].right, "sales");
        assert_eq!(pairs[1].interpretation, "very strong positive correlation");
    }

    #[test]
    fn matrix_rejects_bad_inputs() {
        let mut data = BTreeMap::new();
        data.insert("only".to_string(), vec![1.0, 2.0]);
        assert!(correlation_matrix(&data).is_err());
        data.insert("empty".to_string(), Vec::new());
        let err = correlation_matrix(&data).unwrap_err();
        assert!(err.to_string().contains("dataset 'empty'"));
    }

    #[test]
    fn interpretation_bands() {
        assert_eq!(interpret_correlation(0.8), "strong positive correlation");
        assert_eq!(interpret_correlation(-0.6), "moderate negative correlation");
        assert_eq!(interpret_correlation(0.1), "very weak positive correlation");
    }

    #[test]
    fn small_and_large_scales_still_correlate() {
        let r = pearson(&[0.0, 1e-7, 2e-7], &[0.0, 1e-7, 2e-7]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[1e-200, 2e-200, 3e-200], &[3e200, 2e200, 1e200]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
        assert_eq!(interpret_correlation(r), "very strong negative correlation");
    }
}
