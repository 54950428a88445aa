use data_analyzer::{AnalysisResult, AnalyzerConfig, compute};
use serde_json::Value;

fn close(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

#[test]
fn result_survives_json_round_trip() {
    let original = compute(
        &[10.0, 20.0, 15.0, 25.0, 30.0, 22.0, 18.0, 28.0, 0.1, 1e-7],
        &AnalyzerConfig::default(),
    )
    .unwrap();
    let text = serde_json::to_string(&original).unwrap();
    let parsed: AnalysisResult = serde_json::from_str(&text).unwrap();

    assert!(close(parsed.central_tendency.mean, original.central_tendency.mean));
    assert!(close(
        parsed.dispersion.std_dev.unwrap(),
        original.dispersion.std_dev.unwrap()
    ));
    assert!(close(
        parsed.shape.kurtosis.unwrap(),
        original.shape.kurtosis.unwrap()
    ));
    let (a, b) = (parsed.trend.unwrap(), original.trend.unwrap());
    assert!(close(a.slope, b.slope));
    assert!(close(a.r_squared, b.r_squared));
    for (k, v) in &original.percentiles {
        assert!(close(parsed.percentiles[k], *v));
    }
    assert_eq!(parsed.insights, original.insights);
}

#[test]
fn json_shape_uses_documented_field_names() {
    let result = compute(&[1.0], &AnalyzerConfig::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["central_tendency"]["mean"], Value::from(1.0));
    assert_eq!(json["dispersion"]["std_dev"], Value::Null);
    assert_eq!(json["shape"]["skewness"], Value::Null);
    assert_eq!(json["trend"], Value::Null);
    assert_eq!(json["percentiles"]["50"], Value::from(1.0));
    assert_eq!(json["outliers"]["method"], Value::from("both"));

    let rising = compute(&[1.0, 2.0, 3.0, 4.0], &AnalyzerConfig::default()).unwrap();
    let json = serde_json::to_value(&rising).unwrap();
    assert_eq!(json["trend"]["direction"], Value::from("up"));
    assert_eq!(json["trend"]["strength"], Value::from("strong"));
}
