use std::path::PathBuf;
use std::str::FromStr;

use data_analyzer::AnalyzerConfig;
use simplelog::LevelFilter;

use crate::error::ServiceError;

pub const DEFAULT_MAX_DATA_POINTS: usize = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceConfig {
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub max_data_points: usize,
    pub analyzer: AnalyzerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            log_file: None,
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `LOG_LEVEL`, `LOG_FILE`, `MAX_DATA_POINTS` and
    /// `ANALYZER_Z_THRESHOLD`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        let mut cfg = Self::default();
        if let Some(raw) = non_empty(lookup("LOG_LEVEL")) {
            cfg.log_level = LevelFilter::from_str(&raw)
                .map_err(|_| ServiceError::Config(format!("unknown LOG_LEVEL '{raw}'")))?;
        }
        cfg.log_file = non_empty(lookup("LOG_FILE")).map(PathBuf::from);
        if let Some(raw) = non_empty(lookup("MAX_DATA_POINTS")) {
            cfg.max_data_points = parse_var("MAX_DATA_POINTS", &raw)?;
        }
        if let Some(raw) = non_empty(lookup("ANALYZER_Z_THRESHOLD")) {
            cfg.analyzer.z_threshold = parse_var("ANALYZER_Z_THRESHOLD", &raw)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.max_data_points == 0 {
            return Err(ServiceError::Config(
                "MAX_DATA_POINTS must be at least 1".to_string(),
            ));
        }
        self.analyzer
            .validate()
            .map_err(|err| ServiceError::Config(err.to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T, ServiceError> {
    raw.parse::<T>()
        .map_err(|_| ServiceError::Config(format!("{key} has invalid value '{raw}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ServiceConfig::default());
        assert_eq!(cfg.max_data_points, 10_000);
        assert_eq!(cfg.log_level, LevelFilter::Info);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_FILE", "logs/app.log"),
            ("MAX_DATA_POINTS", "500"),
            ("ANALYZER_Z_THRESHOLD", "2.5"),
        ]))
        .unwrap();
        assert_eq!(cfg.log_level, LevelFilter::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("logs/app.log")));
        assert_eq!(cfg.max_data_points, 500);
        assert_eq!(cfg.analyzer.z_threshold, 2.5);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[("LOG_LEVEL", "loud")])),
            Err(ServiceError::Config(_))
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[("MAX_DATA_POINTS", "0")])),
            Err(ServiceError::Config(_))
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[("ANALYZER_Z_THRESHOLD", "-1")])),
            Err(ServiceError::Config(_))
        ));
        assert!(matches!(
            ServiceConfig::from_lookup(lookup(&[("MAX_DATA_POINTS", "many")])),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn blank_values_are_ignored() {
        let cfg = ServiceConfig::from_lookup(lookup(&[("LOG_FILE", "  ")])).unwrap();
        assert_eq!(cfg.log_file, None);
    }
}
