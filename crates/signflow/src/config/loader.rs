use std::collections::HashSet;
use std::path::Path;

use crate::config::schema::SignFlowConfig;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SignFlowConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<SignFlowConfig, ConfigError> {
    let config: SignFlowConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &SignFlowConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.cache.status_ttl_secs == 0 || config.cache.error_ttl_secs == 0 {
        return Err(ConfigError::Validation {
            message: "Cache TTLs must be greater than zero".to_string(),
        });
    }

    if config.poll.interval_secs == 0 {
        return Err(ConfigError::Validation {
            message: "Poll interval must be greater than zero".to_string(),
        });
    }
    if config.poll.interval_secs > config.poll.timeout_secs {
        return Err(ConfigError::Validation {
            message: format!(
                "Poll interval ({}s) exceeds poll timeout ({}s)",
                config.poll.interval_secs, config.poll.timeout_secs
            ),
        });
    }

    let worker = &config.worker;
    if worker.entry_point.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "Worker entry point must not be empty".to_string(),
        });
    }
    if worker.job_classes.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one worker job class is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for class in &worker.job_classes {
        if class.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "Worker job class names must not be empty".to_string(),
            });
        }
        if !seen.insert(class) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate worker job class: {}", class),
            });
        }
    }

    Ok(())
}
