use crate::AnalysisResult;
use crate::outliers::OutlierSet;
use crate::trend::TrendDirection;

const MEAN_MEDIAN_GAP: f64 = 0.1;
const HIGH_CV: f64 = 50.0;
const LOW_CV: f64 = 10.0;
const NOTABLE_SKEW: f64 = 0.5;

/// Sentences in a fixed order: central tendency, dispersion, shape,
/// outliers, trend.
pub fn generate_insights(result: &AnalysisResult) -> Vec<String> {
    let mut insights = Vec::new();
    let ct = &result.central_tendency;
    let dispersion = &result.dispersion;

    if let Some(sd) = dispersion.std_dev {
        if (ct.mean - ct.median).abs() > sd * MEAN_MEDIAN_GAP {
            insights.push(format!(
                "Mean ({:.4}) differs noticeably from median ({:.4}), suggesting skewed data.",
                ct.mean, ct.median
            ));
        }
    }
    if result.count == 1 {
        insights.push(
            "Only one data point supplied; variance-based statistics are unavailable.".to_string(),
        );
        return insights;
    }

    let constant = dispersion.variance == Some(0.0);
    if constant {
        insights.push("All values are identical; the data has no variability.".to_string());
    } else if let Some(cv) = dispersion.cv {
        if cv.abs() > HIGH_CV {
            insights.push(format!(
                "High variability detected (CV: {:.2}%). Data points are highly dispersed.",
                cv.abs()
            ));
        } else if cv.abs() < LOW_CV {
            insights.push(format!(
                "Low variability detected (CV: {:.2}%). Data points are tightly clustered.",
                cv.abs()
            ));
        }
    }

    let shape = &result.shape;
    if let (Some(skew), Some(text)) = (shape.skewness, &shape.skew_interpretation) {
        if skew.abs() > NOTABLE_SKEW {
            insights.push(format!(
                "Data is {text}. Consider this when interpreting results."
            ));
        }
    }
    if !constant {
        if let Some(text) = &shape.kurtosis_interpretation {
            insights.push(format!("Distribution is {text}."));
        }
    }

    for (label, set) in [
        ("IQR", result.outliers.iqr.as_ref()),
        ("Z-score", result.outliers.zscore.as_ref()),
    ] {
        if let Some(line) = set.and_then(|s| outlier_line(label, s, result.count)) {
            insights.push(line);
        }
    }

    if let Some(trend) = &result.trend {
        insights.push(match trend.direction {
            TrendDirection::Up | TrendDirection::Down => format!(
                "Data shows {} {} trend ({} fit, slope: {:.4}, R²: {:.4}).",
                if trend.direction == TrendDirection::Up { "an" } else { "a" },
                trend.direction.describe(),
                trend.strength.describe(),
                trend.slope,
                trend.r_squared
            ),
            TrendDirection::Stable => format!(
                "Data is stable with no significant trend (slope: {:.4}).",
                trend.slope
            ),
        });
    }

    if insights.is_empty() {
        insights.push("Data appears normally distributed with no significant anomalies.".to_string());
    }
    insights
}

fn outlier_line(label: &str, set: &OutlierSet, count: usize) -> Option<String> {
    let n = set.count();
    if n == 0 {
        return None;
    }
    let noun = if n == 1 { "outlier" } else { "outliers" };
    let pct = n as f64 / count as f64 * 100.0;
    Some(format!(
        "{n} {noun} detected using {label} method ({pct:.1}% of data)."
    ))
}
