use std::fs::{self, File};

use simplelog::{Config, SimpleLogger, WriteLogger};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Installs the process-wide logger: a file logger when `log_file` is set,
/// stderr otherwise. Fails if a logger is already installed.
pub fn init(config: &ServiceConfig) -> Result<(), ServiceError> {
    let installed = match &config.log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(|e| ServiceError::Logging(e.to_string()))?;
            }
            let file = File::create(path).map_err(|e| ServiceError::Logging(e.to_string()))?;
            WriteLogger::init(config.log_level, Config::default(), file)
        }
        None => SimpleLogger::init(config.log_level, Config::default()),
    };
    installed.map_err(|e| ServiceError::Logging(e.to_string()))
}
